//! Image ordering strategies
//!
//! Turns the locator's unordered path list into the sequence a viewing
//! session traverses.

use rand::seq::SliceRandom;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

pub use glimpse_store::SortMethod;

/// Order image paths for a viewing session.
///
/// `descending` reverses the comparator, never the sorted list, so equal
/// keys keep their relative input order. It does not apply to random.
pub fn order_images(mut paths: Vec<PathBuf>, method: SortMethod, descending: bool) -> Vec<PathBuf> {
    match method {
        SortMethod::Random => {
            paths.shuffle(&mut rand::rng());
            paths
        }
        SortMethod::Name => sort_by_key(paths, descending, |p| natural_key(&file_name_lossy(p))),
        SortMethod::Path => sort_by_key(paths, descending, |p| natural_key(&p.to_string_lossy())),
        SortMethod::Size => sort_by_key(paths, descending, file_size),
        SortMethod::Date => sort_by_key(paths, descending, modified_epoch),
    }
}

/// Decorate-sort-undecorate: each key (and each stat call) computed once
fn sort_by_key<K: Ord>(
    paths: Vec<PathBuf>,
    descending: bool,
    key: impl Fn(&Path) -> K,
) -> Vec<PathBuf> {
    let mut decorated: Vec<(K, PathBuf)> = paths.into_iter().map(|p| (key(&p), p)).collect();
    decorated.sort_by(|a, b| {
        let cmp = a.0.cmp(&b.0);
        if descending {
            cmp.reverse()
        } else {
            cmp
        }
    });
    decorated.into_iter().map(|(_, p)| p).collect()
}

fn file_name_lossy(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// File size in bytes; stat errors count as 0
fn file_size(path: &Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}

/// Modification time in unix seconds; stat errors count as epoch 0
fn modified_epoch(path: &Path) -> i64 {
    std::fs::metadata(path)
        .and_then(|m| m.modified())
        .ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

/// Generate a natural sort key (handles numbers correctly)
/// "image2.jpg" < "image10.jpg"
fn natural_key(s: &str) -> Vec<NaturalSortPart> {
    let mut parts = Vec::new();
    let mut current_num = String::new();
    let mut current_str = String::new();

    for c in s.chars() {
        if c.is_ascii_digit() {
            if !current_str.is_empty() {
                parts.push(NaturalSortPart::Str(current_str.to_lowercase()));
                current_str.clear();
            }
            current_num.push(c);
        } else {
            if !current_num.is_empty() {
                parts.push(number_part(&current_num));
                current_num.clear();
            }
            current_str.push(c);
        }
    }

    if !current_num.is_empty() {
        parts.push(number_part(&current_num));
    }
    if !current_str.is_empty() {
        parts.push(NaturalSortPart::Str(current_str.to_lowercase()));
    }

    parts
}

/// Digit runs too long for u64 fall back to text comparison
fn number_part(digits: &str) -> NaturalSortPart {
    match digits.parse::<u64>() {
        Ok(n) => NaturalSortPart::Num(n),
        Err(_) => NaturalSortPart::Str(digits.to_string()),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum NaturalSortPart {
    Num(u64),
    Str(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn paths(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(PathBuf::from).collect()
    }

    fn names(paths: &[PathBuf]) -> Vec<String> {
        paths
            .iter()
            .map(|p| p.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_natural_name_sort() {
        let input = paths(&["img2.jpg", "img10.jpg", "img1.jpg"]);
        let sorted = order_images(input, SortMethod::Name, false);
        assert_eq!(names(&sorted), vec!["img1.jpg", "img2.jpg", "img10.jpg"]);
    }

    #[test]
    fn test_name_sort_descending() {
        let input = paths(&["img2.jpg", "img10.jpg", "img1.jpg"]);
        let sorted = order_images(input, SortMethod::Name, true);
        assert_eq!(names(&sorted), vec!["img10.jpg", "img2.jpg", "img1.jpg"]);
    }

    #[test]
    fn test_name_sort_is_case_insensitive() {
        let input = paths(&["B.jpg", "a.jpg", "C.jpg"]);
        let sorted = order_images(input, SortMethod::Name, false);
        assert_eq!(names(&sorted), vec!["a.jpg", "B.jpg", "C.jpg"]);
    }

    #[test]
    fn test_name_uses_filename_path_uses_full_path() {
        let input = paths(&["/zoo/a.jpg", "/arc/z.jpg"]);

        let by_name = order_images(input.clone(), SortMethod::Name, false);
        assert_eq!(names(&by_name), vec!["/zoo/a.jpg", "/arc/z.jpg"]);

        let by_path = order_images(input, SortMethod::Path, false);
        assert_eq!(names(&by_path), vec!["/arc/z.jpg", "/zoo/a.jpg"]);
    }

    #[test]
    fn test_random_is_permutation_and_ignores_descending() {
        let input = paths(&["a.jpg", "b.jpg", "c.jpg", "d.jpg", "e.jpg"]);

        for descending in [false, true] {
            let mut shuffled = order_images(input.clone(), SortMethod::Random, descending);
            shuffled.sort();
            let mut expected = input.clone();
            expected.sort();
            assert_eq!(shuffled, expected);
        }
    }

    #[test]
    fn test_size_sort_with_missing_file_as_zero() {
        let dir = tempfile::tempdir().unwrap();
        let big = dir.path().join("big.jpg");
        let small = dir.path().join("small.jpg");
        fs::write(&big, vec![0u8; 1000]).unwrap();
        fs::write(&small, vec![0u8; 10]).unwrap();
        let missing = dir.path().join("missing.jpg");

        let sorted = order_images(
            vec![big.clone(), missing.clone(), small.clone()],
            SortMethod::Size,
            false,
        );
        assert_eq!(sorted, vec![missing, small, big]);
    }

    #[test]
    fn test_equal_keys_keep_input_order() {
        // Same filename in different folders: equal name keys
        let input = paths(&["/one/dup.jpg", "/two/dup.jpg", "/three/dup.jpg"]);

        let asc = order_images(input.clone(), SortMethod::Name, false);
        assert_eq!(asc, input);

        let desc = order_images(input.clone(), SortMethod::Name, true);
        assert_eq!(desc, input);
    }

    #[test]
    fn test_huge_digit_runs_do_not_panic() {
        let input = paths(&[
            "img99999999999999999999999999.jpg",
            "img1.jpg",
        ]);
        let sorted = order_images(input, SortMethod::Name, false);
        assert_eq!(sorted.len(), 2);
        assert_eq!(names(&sorted)[0], "img1.jpg");
    }
}
