//! Built-in version bounds per package and Python minor version.
//!
//! A minimum is the first release shipping wheels for that Python version; a
//! maximum is the last release supporting it.

use feu_core::Version;

use super::ConstraintEntry;

type Bound = Option<&'static [u64]>;

#[rustfmt::skip]
const DEFAULT_CONSTRAINTS: &[(&str, &str, Bound, Bound)] = &[
    ("click", "3.9", Some(&[8, 1, 0]), Some(&[8, 1, 8])),
    ("click", "3.10", Some(&[8, 1, 0]), None),
    ("click", "3.11", Some(&[8, 1, 0]), None),
    ("click", "3.12", Some(&[8, 1, 0]), None),
    ("click", "3.13", Some(&[8, 1, 0]), None),
    ("click", "3.14", Some(&[8, 1, 0]), None),

    ("jax", "3.9", Some(&[0, 4, 6]), Some(&[0, 4, 30])),
    ("jax", "3.10", Some(&[0, 4, 6]), None),
    ("jax", "3.11", Some(&[0, 4, 6]), None),
    ("jax", "3.12", Some(&[0, 4, 17]), None),
    ("jax", "3.13", Some(&[0, 4, 34]), None),
    ("jax", "3.14", Some(&[0, 7, 2]), None),

    ("matplotlib", "3.9", Some(&[3, 3, 3]), Some(&[3, 9, 4])),
    ("matplotlib", "3.10", Some(&[3, 5, 0]), None),
    ("matplotlib", "3.11", Some(&[3, 6, 0]), None),
    ("matplotlib", "3.12", Some(&[3, 8, 0]), None),
    ("matplotlib", "3.13", Some(&[3, 9, 1]), None),
    ("matplotlib", "3.14", Some(&[3, 10, 7]), None),

    ("numpy", "3.9", Some(&[1, 19, 3]), Some(&[2, 0, 2])),
    ("numpy", "3.10", Some(&[1, 21, 3]), None),
    ("numpy", "3.11", Some(&[1, 23, 2]), None),
    ("numpy", "3.12", Some(&[1, 26, 0]), None),
    ("numpy", "3.13", Some(&[2, 1, 0]), None),
    ("numpy", "3.14", Some(&[2, 3, 2]), None),

    ("pandas", "3.9", Some(&[1, 1, 3]), Some(&[2, 2, 3])),
    ("pandas", "3.10", Some(&[1, 3, 4]), None),
    ("pandas", "3.11", Some(&[1, 5, 0]), None),
    ("pandas", "3.12", Some(&[2, 1, 1]), None),
    ("pandas", "3.13", Some(&[2, 2, 3]), None),
    ("pandas", "3.14", Some(&[2, 3, 3]), None),

    ("pyarrow", "3.9", Some(&[3, 0, 0]), None),
    ("pyarrow", "3.10", Some(&[6, 0, 0]), None),
    ("pyarrow", "3.11", Some(&[10, 0, 1]), None),
    ("pyarrow", "3.12", Some(&[14, 0, 0]), None),
    ("pyarrow", "3.13", Some(&[18, 0, 0]), None),
    ("pyarrow", "3.14", Some(&[22, 0, 0]), None),

    ("requests", "3.9", Some(&[2, 30, 0]), None),
    ("requests", "3.10", Some(&[2, 30, 0]), None),
    ("requests", "3.11", Some(&[2, 30, 0]), None),
    ("requests", "3.12", Some(&[2, 30, 0]), None),
    ("requests", "3.13", Some(&[2, 30, 0]), None),
    ("requests", "3.14", Some(&[2, 30, 0]), None),

    ("scikit-learn", "3.9", Some(&[0, 24, 0]), Some(&[1, 6, 1])),
    ("scikit-learn", "3.10", Some(&[1, 0, 1]), None),
    ("scikit-learn", "3.11", Some(&[1, 1, 3]), None),
    ("scikit-learn", "3.12", Some(&[1, 3, 1]), None),
    ("scikit-learn", "3.13", Some(&[1, 5, 2]), None),
    ("scikit-learn", "3.14", Some(&[1, 7, 2]), None),

    ("scipy", "3.9", Some(&[1, 5, 4]), Some(&[1, 13, 1])),
    ("scipy", "3.10", Some(&[1, 7, 2]), None),
    ("scipy", "3.11", Some(&[1, 9, 2]), None),
    ("scipy", "3.12", Some(&[1, 11, 2]), None),
    ("scipy", "3.13", Some(&[1, 14, 1]), None),
    ("scipy", "3.14", Some(&[1, 16, 1]), None),

    ("torch", "3.9", Some(&[1, 7, 1]), None),
    ("torch", "3.10", Some(&[1, 11, 0]), None),
    ("torch", "3.11", Some(&[2, 0, 0]), None),
    ("torch", "3.12", Some(&[2, 2, 0]), None),
    ("torch", "3.13", Some(&[2, 5, 0]), None),
    ("torch", "3.14", Some(&[2, 9, 0]), None),

    ("xarray", "3.9", None, Some(&[2024, 7, 0])),
    ("xarray", "3.10", Some(&[2022, 3, 0]), None),
    ("xarray", "3.11", Some(&[2022, 12, 0]), None),
    ("xarray", "3.12", Some(&[2023, 10, 0]), None),
    ("xarray", "3.13", Some(&[2024, 10, 0]), None),
    ("xarray", "3.14", Some(&[2025, 9, 1]), None),
];

/// Iterate over the built-in `(package, python_version, entry)` rows
pub(crate) fn default_entries() -> impl Iterator<Item = (&'static str, &'static str, ConstraintEntry)> {
    DEFAULT_CONSTRAINTS.iter().map(|(package, python, min, max)| {
        let entry = ConstraintEntry {
            min: min.map(|release| Version::new(release.to_vec())),
            max: max.map(|release| Version::new(release.to_vec())),
        };
        (*package, *python, entry)
    })
}
