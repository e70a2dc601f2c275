use log::{debug, info};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::Swagger;

static REPEATED_SLASHES: Lazy<Regex> = Lazy::new(|| Regex::new(r"/{2,}").unwrap());

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOptions {
    /// Remove the base document's basePath prefix from overlay path keys
    pub strip_base_path: bool,
}

/// Unions the collection sections of overlay documents into a base document
pub struct Merger {
    options: MergeOptions,
}

impl Merger {
    pub fn new(options: MergeOptions) -> Self {
        Self { options }
    }

    /// Merge every overlay into `base`, in order, and return the result.
    ///
    /// Singleton fields of the base (info, host, basePath, ...) are never
    /// touched. Keyed sections are last-write-wins; list sections append.
    pub fn merge(&self, base: Swagger, overlays: impl IntoIterator<Item = Swagger>) -> Swagger {
        let mut target = base;
        for (index, overlay) in overlays.into_iter().enumerate() {
            debug!("Merging overlay #{}: {}", index + 1, overlay.info.title);
            self.merge_one(&mut target, overlay);
        }
        target
    }

    fn merge_one(&self, target: &mut Swagger, overlay: Swagger) {
        let path_count = overlay.paths.len();
        let definition_count = overlay.definitions.len();

        for tag in overlay.tags {
            target.tag(tag);
        }
        for scheme in overlay.schemes {
            target.scheme(scheme);
        }
        for media_type in overlay.consumes {
            target.consumes(media_type);
        }
        for media_type in overlay.produces {
            target.produces(media_type);
        }
        for requirement in overlay.security {
            target.security(requirement);
        }

        let base_path = if self.options.strip_base_path {
            target.basePath.clone()
        } else {
            None
        };
        for (key, item) in overlay.paths {
            let key = match &base_path {
                Some(base_path) => strip_base_path(&key, base_path),
                None => key,
            };
            let methods: Vec<&str> = item.operations().into_iter().map(|(m, _)| m).collect();
            debug!("Path {} [{}]", key, methods.join(", "));
            target.path(key, item);
        }

        for (name, scheme) in overlay.securityDefinitions {
            target.security_definition(name, scheme);
        }
        for (name, schema) in overlay.definitions {
            target.definition(name, schema);
        }
        for (name, parameter) in overlay.parameters {
            target.parameter(name, parameter);
        }
        for (name, response) in overlay.responses {
            target.response(name, response);
        }
        for (key, value) in overlay.extensions {
            target.vendor_extension(key, value);
        }

        info!(
            "Merged {}: {} paths, {} definitions",
            overlay.info.title, path_count, definition_count
        );
    }
}

/// Merge `overlays` into `base` with the given options
pub fn merge(
    base: Swagger,
    overlays: impl IntoIterator<Item = Swagger>,
    options: &MergeOptions,
) -> Swagger {
    Merger::new(*options).merge(base, overlays)
}

/// Remove a leading `base_path` from a path key.
///
/// The base path matches with or without its leading slash and only on a
/// segment boundary: `/v1` strips from `/v1/users` but leaves `/v10/users`
/// alone rather than producing `0/users`. Runs of slashes in the result
/// collapse to one.
pub fn strip_base_path(key: &str, base_path: &str) -> String {
    let prefix = base_path.trim_matches('/');
    if prefix.is_empty() {
        return key.to_string();
    }

    let rest = key
        .strip_prefix('/')
        .unwrap_or(key)
        .strip_prefix(prefix)
        .filter(|rest| rest.is_empty() || rest.starts_with('/'));

    match rest {
        Some(rest) => {
            let stripped = REPEATED_SLASHES.replace_all(rest, "/");
            let stripped = if stripped.is_empty() {
                "/".to_string()
            } else {
                stripped.into_owned()
            };
            debug!("Stripped base path from {} -> {}", key, stripped);
            stripped
        }
        None => key.to_string(),
    }
}
