//! Unit tests for the constraint registry

use super::*;
use proptest::prelude::*;

fn registry_with(package: &str, python: &str, min: Option<&str>, max: Option<&str>) -> ConstraintRegistry {
    let mut registry = ConstraintRegistry::new();
    registry.add(package, python, min, max, false).unwrap();
    registry
}

#[test]
fn test_defaults_are_loaded() {
    let registry = ConstraintRegistry::with_defaults();
    let packages: Vec<&str> = registry.packages().collect();
    for expected in [
        "numpy",
        "pandas",
        "torch",
        "scipy",
        "scikit-learn",
        "pyarrow",
        "matplotlib",
        "xarray",
        "jax",
        "click",
        "requests",
    ] {
        assert!(packages.contains(&expected), "missing defaults for {expected}");
        assert_eq!(registry.python_versions(expected).count(), 6);
    }

    let numpy = registry.get("numpy", "3.11");
    assert_eq!(numpy.min, Some("1.23.2".parse().unwrap()));
    assert_eq!(numpy.max, None);
}

#[test]
fn test_get_is_exact_match() {
    let registry = ConstraintRegistry::with_defaults();
    assert!(registry.has("numpy", "3.11"));
    assert!(!registry.has("numpy", "3.11.2"));
    assert!(registry.get("numpy", "3.11.2").is_empty());
    assert!(registry.get("unknown-package", "3.11").is_empty());
}

#[test]
fn test_add_duplicate_without_overwrite_fails() {
    let mut registry = registry_with("my-package", "3.11", Some("1.0"), Some("2.0"));

    let result = registry.add("my-package", "3.11", Some("1.5"), None, false);
    match result.unwrap_err() {
        FeuError::DuplicateConfig { key, .. } => assert_eq!(key, "my-package on Python 3.11"),
        other => panic!("Expected DuplicateConfig error, got {other:?}"),
    }

    // Registry left unchanged
    let entry = registry.get("my-package", "3.11");
    assert_eq!(entry, ConstraintEntry::parse(Some("1.0"), Some("2.0")).unwrap());
}

#[test]
fn test_add_with_overwrite_replaces() {
    let mut registry = registry_with("my-package", "3.11", Some("1.0"), Some("2.0"));
    registry.add("my-package", "3.11", Some("1.5"), None, true).unwrap();

    let entry = registry.get("my-package", "3.11");
    assert_eq!(entry.min, Some("1.5".parse().unwrap()));
    assert_eq!(entry.max, None);
}

#[test]
fn test_add_rejects_invalid_bounds() {
    let mut registry = ConstraintRegistry::new();
    let result = registry.add("my-package", "3.11", Some("not-a-version"), None, false);
    assert!(matches!(result, Err(FeuError::InvalidVersion { .. })));
    assert!(!registry.has("my-package", "3.11"));
}

#[test]
fn test_clamp() {
    let registry = registry_with("numpy", "3.11", Some("1.23.2"), Some("2.1.0rc1"));

    assert_eq!(registry.clamp("numpy", "1.0.0", "3.11").unwrap(), "1.23.2");
    assert_eq!(registry.clamp("numpy", "3.0.0", "3.11").unwrap(), "2.1.0");
    // In range: original spelling preserved
    assert_eq!(registry.clamp("numpy", "v1.26.04", "3.11").unwrap(), "v1.26.04");
    // No entry for this Python version
    assert_eq!(registry.clamp("numpy", "1.0.0", "3.12").unwrap(), "1.0.0");
    assert!(registry.clamp("numpy", "bogus", "3.11").is_err());
}

#[test]
fn test_closest_version_end_to_end() {
    let registry = registry_with("pandas", "3.11", Some("2.2.2"), None);
    assert_eq!(registry.clamp("pandas", "1.0.0", "3.11").unwrap(), "2.2.2");
    assert!(!registry.is_valid("pandas", "1.0.0", "3.11").unwrap());
    assert!(registry.is_valid("pandas", "2.2.2", "3.11").unwrap());
}

#[test]
fn test_default_numpy_versions() {
    let registry = ConstraintRegistry::with_defaults();
    assert_eq!(registry.clamp("numpy", "2.0.2", "3.10").unwrap(), "2.0.2");
    assert_eq!(registry.clamp("numpy", "2.2.0", "3.9").unwrap(), "2.0.2");
    assert!(registry.is_valid("numpy", "2.0.2", "3.10").unwrap());
    assert!(!registry.is_valid("numpy", "1.22.0", "3.11").unwrap());
}

#[test]
fn test_is_valid_without_entry() {
    let registry = ConstraintRegistry::new();
    assert!(registry.is_valid("anything", "0.0.1", "3.11").unwrap());
}

fn arb_release() -> impl Strategy<Value = Vec<u64>> {
    prop::collection::vec(0u64..10, 1..4)
}

fn bounds() -> impl Strategy<Value = (Option<Version>, Option<Version>)> {
    (prop::option::of(arb_release()), prop::option::of(arb_release())).prop_map(|(a, b)| {
        let a = a.map(Version::new);
        let b = b.map(Version::new);
        match (a, b) {
            (Some(a), Some(b)) if a > b => (Some(b), Some(a)),
            other => other,
        }
    })
}

proptest! {
    #[test]
    fn clamp_is_idempotent((min, max) in bounds(), requested in arb_release()) {
        let mut registry = ConstraintRegistry::new();
        registry.add_entry("pkg", "3.11", ConstraintEntry::new(min, max), false).unwrap();

        let requested = Version::new(requested).to_string();
        let once = registry.clamp("pkg", &requested, "3.11").unwrap();
        let twice = registry.clamp("pkg", &once, "3.11").unwrap();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn clamp_moves_to_nearest_bound((min, max) in bounds(), requested in arb_release()) {
        let entry = ConstraintEntry::new(min.clone(), max.clone());
        let mut registry = ConstraintRegistry::new();
        registry.add_entry("pkg", "3.11", entry, false).unwrap();

        let version = Version::new(requested);
        let requested = version.to_string();
        let clamped = registry.clamp("pkg", &requested, "3.11").unwrap();

        if let Some(min) = min.as_ref().filter(|min| version < **min) {
            prop_assert_eq!(clamped, min.base_version());
        } else if let Some(max) = max.as_ref().filter(|max| version > **max) {
            prop_assert_eq!(clamped, max.base_version());
        } else {
            prop_assert_eq!(clamped, requested);
        }
    }

    #[test]
    fn validity_agrees_with_clamp((min, max) in bounds(), requested in arb_release()) {
        let mut registry = ConstraintRegistry::new();
        registry.add_entry("pkg", "3.11", ConstraintEntry::new(min, max), false).unwrap();

        let requested = Version::new(requested).to_string();
        let valid = registry.is_valid("pkg", &requested, "3.11").unwrap();
        let unchanged = registry.clamp("pkg", &requested, "3.11").unwrap() == requested;
        prop_assert_eq!(valid, unchanged);
    }
}
