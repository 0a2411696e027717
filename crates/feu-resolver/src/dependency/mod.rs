//! Package-specific dependency resolvers.
//!
//! A resolver expands one install target into the ordered list of
//! requirements handed to the installer: the target itself first, then fixed
//! companion packages, then compatibility pins.

use indexmap::IndexMap;
use tracing::debug;

use feu_core::error::FeuError;
use feu_core::{PackageDependency, PackageSpec, Version};

use crate::ResolverResult;

/// Specifier applied to numpy for releases that predate numpy 2 support
pub const NUMPY_BELOW_2: &str = "<2.0.0";

/// First release of each package built against numpy 2
#[rustfmt::skip]
const NUMPY2_COMPATIBLE_SINCE: &[(&str, &[u64])] = &[
    ("matplotlib", &[3, 8, 4]),
    ("pandas", &[2, 2, 2]),
    ("pyarrow", &[16, 0]),
    ("scikit-learn", &[1, 4, 2]),
    ("scipy", &[1, 13, 0]),
    ("torch", &[2, 3, 0]),
    ("xarray", &[2024, 6, 0]),
];

/// First jax release built against numpy 2
const JAX_NUMPY2_SINCE: &[u64] = &[0, 4, 26];

/// jax releases needing `ml_dtypes<=0.2.0`
const JAX_ML_DTYPES_RANGE: (&[u64], &[u64]) = (&[0, 4, 9], &[0, 4, 11]);

/// Strategy computing the dependencies of one package
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DependencyResolver {
    /// Install the target verbatim
    Default,
    /// Pin `numpy<2.0.0` for releases older than `min_version`
    NumpyCompat { min_version: Version },
    /// jax with a matching jaxlib and its known transitive pins
    Jax,
}

static DEFAULT_RESOLVER: DependencyResolver = DependencyResolver::Default;

impl DependencyResolver {
    pub fn numpy_compat(min_version: Version) -> Self {
        Self::NumpyCompat { min_version }
    }

    /// Built-in resolver for a package, if it has one
    pub fn for_package(package: &str) -> Option<Self> {
        if package == "jax" {
            return Some(Self::Jax);
        }
        NUMPY2_COMPATIBLE_SINCE
            .iter()
            .find(|(name, _)| *name == package)
            .map(|(_, release)| Self::numpy_compat(Version::new(release.to_vec())))
    }

    pub fn matplotlib() -> Self {
        Self::builtin_numpy_compat("matplotlib")
    }

    pub fn pandas() -> Self {
        Self::builtin_numpy_compat("pandas")
    }

    pub fn pyarrow() -> Self {
        Self::builtin_numpy_compat("pyarrow")
    }

    pub fn scikit_learn() -> Self {
        Self::builtin_numpy_compat("scikit-learn")
    }

    pub fn scipy() -> Self {
        Self::builtin_numpy_compat("scipy")
    }

    pub fn torch() -> Self {
        Self::builtin_numpy_compat("torch")
    }

    pub fn xarray() -> Self {
        Self::builtin_numpy_compat("xarray")
    }

    fn builtin_numpy_compat(package: &str) -> Self {
        Self::for_package(package).unwrap_or(Self::Default)
    }

    /// Compute the ordered dependency list for a spec
    pub fn resolve(&self, spec: &PackageSpec) -> ResolverResult<Vec<PackageDependency>> {
        let mut deps = vec![spec.to_dependency()];

        match self {
            DependencyResolver::Default => {},
            DependencyResolver::NumpyCompat { min_version } => {
                if let Some(version) = spec.parsed_version()? {
                    if version < *min_version {
                        deps.push(numpy_pin());
                    }
                }
            },
            DependencyResolver::Jax => {
                let mut jaxlib = PackageDependency::new("jaxlib");
                if let Some(ref raw) = spec.version {
                    jaxlib = jaxlib.with_specifier(format!("=={}", raw));
                }
                deps.push(jaxlib);

                if let Some(version) = spec.parsed_version()? {
                    if version < Version::new(JAX_NUMPY2_SINCE.to_vec()) {
                        deps.push(numpy_pin());
                    }
                    let (low, high) = JAX_ML_DTYPES_RANGE;
                    if version >= Version::new(low.to_vec()) && version <= Version::new(high.to_vec()) {
                        deps.push(PackageDependency::new("ml_dtypes").with_specifier("<=0.2.0"));
                    }
                }
            },
        }

        Ok(deps)
    }
}

fn numpy_pin() -> PackageDependency {
    PackageDependency::new("numpy").with_specifier(NUMPY_BELOW_2)
}

/// Map `package -> resolver` with a Default fallback
#[derive(Debug, Clone, Default)]
pub struct DependencyResolverRegistry {
    resolvers: IndexMap<String, DependencyResolver>,
}

impl DependencyResolverRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the built-in resolvers
    pub fn with_defaults() -> Self {
        let mut resolvers = IndexMap::new();
        resolvers.insert("jax".to_string(), DependencyResolver::Jax);
        for (package, release) in NUMPY2_COMPATIBLE_SINCE {
            resolvers.insert(
                package.to_string(),
                DependencyResolver::numpy_compat(Version::new(release.to_vec())),
            );
        }
        Self { resolvers }
    }

    /// Register a resolver; fails without touching the registry when the
    /// package exists and `overwrite` is false
    pub fn add(&mut self, package: &str, resolver: DependencyResolver, overwrite: bool) -> ResolverResult<()> {
        if !overwrite && self.has(package) {
            return Err(FeuError::DuplicateConfig {
                kind: "Dependency resolver".to_string(),
                key: package.to_string(),
            });
        }
        debug!("Registering resolver for {}: {:?}", package, resolver);
        self.resolvers.insert(package.to_string(), resolver);
        Ok(())
    }

    pub fn has(&self, package: &str) -> bool {
        self.resolvers.contains_key(package)
    }

    /// Registered resolver, or the Default resolver when none is registered
    pub fn find_resolver(&self, package: &str) -> &DependencyResolver {
        self.resolvers.get(package).unwrap_or(&DEFAULT_RESOLVER)
    }

    /// Registered `(package, resolver)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &DependencyResolver)> {
        self.resolvers.iter().map(|(package, resolver)| (package.as_str(), resolver))
    }

    /// Resolve a spec with the resolver registered for its package
    pub fn resolve(&self, spec: &PackageSpec) -> ResolverResult<Vec<PackageDependency>> {
        let resolver = self.find_resolver(&spec.name);
        debug!("Resolving {} with {:?}", spec, resolver);
        resolver.resolve(spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dep(name: &str, specifier: &str) -> PackageDependency {
        PackageDependency::new(name).with_specifier(specifier)
    }

    #[test]
    fn test_default_resolver() {
        let deps = DependencyResolver::Default
            .resolve(&PackageSpec::pinned("pkg", "1.2.3"))
            .unwrap();
        assert_eq!(deps, vec![dep("pkg", "==1.2.3")]);
    }

    #[test]
    fn test_default_resolver_keeps_extras() {
        let spec = PackageSpec::pinned("requests", "2.32.0").with_extras(["security", "socks"]);
        let deps = DependencyResolver::Default.resolve(&spec).unwrap();
        assert_eq!(deps.len(), 1);
        assert_eq!(deps[0].to_string(), "requests[security,socks]==2.32.0");
    }

    #[test]
    fn test_numpy_compat_boundary() {
        let resolver = DependencyResolver::pandas();
        assert_eq!(
            resolver,
            DependencyResolver::numpy_compat("2.2.2".parse().unwrap())
        );

        let deps = resolver.resolve(&PackageSpec::pinned("pandas", "2.2.2")).unwrap();
        assert_eq!(deps, vec![dep("pandas", "==2.2.2")]);

        let deps = resolver.resolve(&PackageSpec::pinned("pandas", "2.2.1")).unwrap();
        assert_eq!(deps, vec![dep("pandas", "==2.2.1"), dep("numpy", "<2.0.0")]);
    }

    #[test]
    fn test_numpy_compat_without_version() {
        let deps = DependencyResolver::torch().resolve(&PackageSpec::new("torch")).unwrap();
        assert_eq!(deps, vec![PackageDependency::new("torch")]);
    }

    #[test]
    fn test_numpy_compat_invalid_version() {
        let result = DependencyResolver::scipy().resolve(&PackageSpec::pinned("scipy", "latest"));
        assert!(matches!(result, Err(FeuError::InvalidVersion { .. })));
    }

    #[test]
    fn test_named_thresholds() {
        let cases = [
            (DependencyResolver::matplotlib(), "3.8.4"),
            (DependencyResolver::pyarrow(), "16.0"),
            (DependencyResolver::scikit_learn(), "1.4.2"),
            (DependencyResolver::scipy(), "1.13.0"),
            (DependencyResolver::torch(), "2.3.0"),
            (DependencyResolver::xarray(), "2024.6.0"),
        ];
        for (resolver, threshold) in cases {
            assert_eq!(resolver, DependencyResolver::numpy_compat(threshold.parse().unwrap()));
        }
        assert_eq!(DependencyResolver::for_package("jax"), Some(DependencyResolver::Jax));
        assert_eq!(DependencyResolver::for_package("requests"), None);
    }

    #[test]
    fn test_jax_narrow_range() {
        let deps = DependencyResolver::Jax.resolve(&PackageSpec::pinned("jax", "0.4.9")).unwrap();
        assert_eq!(
            deps,
            vec![
                dep("jax", "==0.4.9"),
                dep("jaxlib", "==0.4.9"),
                dep("numpy", "<2.0.0"),
                dep("ml_dtypes", "<=0.2.0"),
            ]
        );

        let deps = DependencyResolver::Jax.resolve(&PackageSpec::pinned("jax", "0.4.12")).unwrap();
        assert_eq!(
            deps,
            vec![dep("jax", "==0.4.12"), dep("jaxlib", "==0.4.12"), dep("numpy", "<2.0.0")]
        );
    }

    #[test]
    fn test_jax_recent_release() {
        let deps = DependencyResolver::Jax.resolve(&PackageSpec::pinned("jax", "0.4.26")).unwrap();
        assert_eq!(deps, vec![dep("jax", "==0.4.26"), dep("jaxlib", "==0.4.26")]);

        let unpinned = DependencyResolver::Jax.resolve(&PackageSpec::new("jax")).unwrap();
        assert_eq!(unpinned, vec![PackageDependency::new("jax"), PackageDependency::new("jaxlib")]);
    }

    #[test]
    fn test_registry_find_resolver() {
        let registry = DependencyResolverRegistry::with_defaults();
        assert!(registry.has("pandas"));
        assert!(registry.has("jax"));
        assert!(!registry.has("requests"));
        assert_eq!(registry.find_resolver("jax"), &DependencyResolver::Jax);
        assert_eq!(registry.find_resolver("requests"), &DependencyResolver::Default);
        // Lookup never registers the fallback
        assert!(!registry.has("requests"));
    }

    #[test]
    fn test_registry_duplicate_guard() {
        let mut registry = DependencyResolverRegistry::new();
        registry.add("mypkg", DependencyResolver::Jax, false).unwrap();

        let result = registry.add("mypkg", DependencyResolver::Default, false);
        assert!(matches!(result, Err(FeuError::DuplicateConfig { .. })));
        assert_eq!(registry.find_resolver("mypkg"), &DependencyResolver::Jax);

        registry.add("mypkg", DependencyResolver::Default, true).unwrap();
        assert_eq!(registry.find_resolver("mypkg"), &DependencyResolver::Default);
    }

    #[test]
    fn test_registry_resolve_dispatch() {
        let registry = DependencyResolverRegistry::with_defaults();

        let deps = registry.resolve(&PackageSpec::pinned("pandas", "2.1.1")).unwrap();
        assert_eq!(deps, vec![dep("pandas", "==2.1.1"), dep("numpy", "<2.0.0")]);

        let deps = registry.resolve(&PackageSpec::pinned("requests", "2.32.0")).unwrap();
        assert_eq!(deps, vec![dep("requests", "==2.32.0")]);
    }
}
