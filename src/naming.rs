//! Resource name derivation
//!
//! A resource name is the store-facing grouping key of a resolver. With no
//! resources subpath it is the type's full name; otherwise it follows
//! `{root}.{subpath}.{full name without the root prefix}`:
//!
//! - `my_app.views.Home`, root `my_app`, no subpath -> `my_app.views.Home`
//! - `my_app.views.Home`, root `my_app`, subpath `Resources` -> `my_app.Resources.views.Home`

use crate::{Result, require_non_empty};

/// Identity of a type used as a resource source.
///
/// `full_name` is the dotted path used for name derivation; `module` names
/// the owning crate, whose settings supply the root namespace and subpath.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeIdentity {
    qualified_name: String,
    full_name: String,
    module: String,
}

impl TypeIdentity {
    /// Identity of a Rust type, from its path (`my_app::views::Home`).
    ///
    /// Generic arguments are kept in the cache identity but not in the name,
    /// so `Page<A>` and `Page<B>` get separate resolvers over one resource.
    pub fn of<T: ?Sized + 'static>() -> Self {
        let qualified = std::any::type_name::<T>();
        let path = qualified.split('<').next().unwrap_or(qualified);
        let module = path.split("::").next().unwrap_or(path);

        Self {
            qualified_name: qualified.to_string(),
            full_name: path.replace("::", "."),
            module: module.to_string(),
        }
    }

    /// Identity from an explicit dotted full name and owning module
    pub fn new(full_name: impl Into<String>, module: impl Into<String>) -> Result<Self> {
        let full_name = full_name.into();
        let module = module.into();
        require_non_empty(&full_name, "full_name")?;
        require_non_empty(&module, "module")?;

        Ok(Self {
            qualified_name: format!("{}, {}", full_name, module),
            full_name,
            module,
        })
    }

    /// Unique key of this identity (the resolver cache key)
    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn module(&self) -> &str {
        &self.module
    }
}

/// Derive the store-facing resource name.
///
/// `resources_subpath` may use `/` or `\` as separators; they become `.`.
pub fn derive_resource_name(
    type_full_name: &str,
    root_namespace: &str,
    resources_subpath: Option<&str>,
) -> Result<String> {
    require_non_empty(type_full_name, "type_full_name")?;
    require_non_empty(root_namespace, "root_namespace")?;

    let subpath = resources_subpath.map(normalize_subpath).unwrap_or_default();
    if subpath.is_empty() {
        return Ok(type_full_name.to_string());
    }

    let prefix = format!("{}.", root_namespace);
    let relative = type_full_name.strip_prefix(&prefix).unwrap_or(type_full_name);
    Ok(format!("{}.{}.{}", root_namespace, subpath, relative))
}

/// Turn a directory-like subpath into dotted form
pub fn normalize_subpath(path: &str) -> String {
    path.replace(['/', '\\'], ".").trim_matches('.').to_string()
}

/// Cache key of a base-name/location identity.
///
/// Base names are dotted paths; one containing `,L=` is outside the accepted
/// input and may share a key with another pair.
pub fn location_key(base_name: &str, location: &str) -> String {
    format!("B={},L={}", base_name, location)
}
