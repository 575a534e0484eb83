//! Runtime dispatch over typed candidate lists
//!
//! The library is implemented on two layers: an interface layer whose
//! arguments are type-erased ([`crate::image::DynImage`] handles, variants),
//! and a typed layer of generic implementations. An interface entry point
//! switches to the right typed instantiation at runtime by trying an ordered
//! list of candidates: each candidate downcasts the erased arguments to its
//! static types and reports [`Tried::Pass`] when any downcast fails, which
//! is the ordinary "try the next candidate" signal, never a panic. The
//! first candidate whose arguments all downcast is invoked, and its result
//! is returned unchanged.
//!
//! First match wins; there is no "best match" scoring. Candidate lists are
//! conventionally organized in two tiers (narrow, grid-aware
//! specializations first, then a generic fallback), so declaration order is
//! a performance contract.

use crate::error::{Error, Result};

/// Outcome of trying one dispatch candidate.
#[derive(Debug)]
pub enum Tried<R> {
    /// The candidate matched the runtime types and ran to completion (which
    /// may itself have produced an error; it is forwarded unchanged).
    Done(Result<R>),
    /// At least one downcast failed; the next candidate should be tried.
    Pass,
}

/// One typed instantiation tried by [`first_suitable`].
pub type Candidate<A, R> = fn(&mut A) -> Tried<R>;

/// Invoke the first candidate whose runtime argument types match.
///
/// Candidates are tried strictly in declaration order; ties are impossible
/// because the first match returns. When no candidate matches, the result is
/// [`Error::NotImplemented`], a recoverable condition left to the caller.
pub fn first_suitable<A, R>(args: &mut A, candidates: &[Candidate<A, R>]) -> Result<R> {
    for candidate in candidates {
        match candidate(args) {
            Tried::Done(result) => return result,
            Tried::Pass => continue,
        }
    }
    Err(Error::NotImplemented)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::{downcast_image, Coordinate, DynImage, Image};

    struct Args<'a> {
        image: &'a dyn DynImage,
        calls: Vec<&'static str>,
    }

    fn candidate_u8(args: &mut Args) -> Tried<u32> {
        let Some(image) = downcast_image::<u8>(args.image) else {
            return Tried::Pass;
        };
        args.calls.push("u8");
        Tried::Done(Ok(image.len() as u32))
    }

    fn candidate_f32(args: &mut Args) -> Tried<u32> {
        let Some(image) = downcast_image::<f32>(args.image) else {
            return Tried::Pass;
        };
        args.calls.push("f32");
        Tried::Done(Ok(image.len() as u32 + 1000))
    }

    #[test]
    fn test_first_matching_candidate_runs_exactly_once() {
        let image: Image<f32> = Image::alloc(&Coordinate::xy(3, 2)).unwrap();
        let mut args = Args {
            image: &image,
            calls: Vec::new(),
        };
        let result =
            first_suitable(&mut args, &[candidate_u8 as Candidate<_, _>, candidate_f32 as Candidate<_, _>]).unwrap();
        assert_eq!(result, 1006u32);
        assert_eq!(args.calls, vec!["f32"]);
    }

    #[test]
    fn test_declaration_order_breaks_ties() {
        fn candidate_u8_second(args: &mut Args) -> Tried<u32> {
            if downcast_image::<u8>(args.image).is_none() {
                return Tried::Pass;
            }
            args.calls.push("u8-second");
            Tried::Done(Ok(2))
        }

        let image: Image<u8> = Image::alloc(&Coordinate::xy(2, 2)).unwrap();
        let mut args = Args {
            image: &image,
            calls: Vec::new(),
        };
        let result =
            first_suitable(&mut args, &[candidate_u8 as Candidate<_, _>, candidate_u8_second as Candidate<_, _>]).unwrap();
        assert_eq!(result, 4u32);
        assert_eq!(args.calls, vec!["u8"]);
    }

    #[test]
    fn test_no_match_is_not_implemented_without_side_effects() {
        let image: Image<i32> = Image::alloc(&Coordinate::xy(2, 2)).unwrap();
        let mut args = Args {
            image: &image,
            calls: Vec::new(),
        };
        let result = first_suitable(&mut args, &[candidate_u8 as Candidate<_, _>, candidate_f32 as Candidate<_, _>]);
        assert_eq!(result, Err(Error::NotImplemented));
        assert!(args.calls.is_empty());
    }

    #[test]
    fn test_candidate_errors_are_forwarded_unchanged() {
        fn failing(args: &mut Args) -> Tried<u32> {
            if downcast_image::<i32>(args.image).is_none() {
                return Tried::Pass;
            }
            args.calls.push("failing");
            Tried::Done(Err(Error::NotAllocated))
        }

        let image: Image<i32> = Image::alloc(&Coordinate::xy(2, 2)).unwrap();
        let mut args = Args {
            image: &image,
            calls: Vec::new(),
        };
        let result = first_suitable(&mut args, &[failing as Candidate<_, _>, candidate_u8 as Candidate<_, _>]);
        assert_eq!(result, Err(Error::NotAllocated));
        assert_eq!(args.calls, vec!["failing"]);
    }
}
