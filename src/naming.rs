//! Flag, environment variable and usage names derived from a field path.

use heck::{ToKebabCase, ToShoutySnakeCase, ToSnakeCase};

use crate::walk::FieldSpec;

fn explicit(value: Option<&'static str>) -> Option<&'static str> {
    value.filter(|v| !v.is_empty())
}

fn segments<'p>(
    path: &'p [&'static str],
    spec: &'p FieldSpec,
) -> impl Iterator<Item = &'static str> + 'p {
    path.iter().copied().chain(std::iter::once(spec.name))
}

/// `mongo.hosts` → `mongo-hosts`.
pub(crate) fn flag_name(path: &[&'static str], spec: &FieldSpec) -> String {
    if let Some(flag) = explicit(spec.flag) {
        return flag.to_string();
    }
    segments(path, spec).map(|s| s.to_kebab_case()).collect::<Vec<_>>().join("-")
}

/// `mongo.hosts` under command `cool` → `COOL_MONGO_HOSTS`.
pub(crate) fn env_name(command: &str, path: &[&'static str], spec: &FieldSpec) -> String {
    if let Some(env) = explicit(spec.env) {
        return env.to_string();
    }
    std::iter::once(command.to_shouty_snake_case())
        .chain(segments(path, spec).map(|s| s.to_shouty_snake_case()))
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

/// The `help` text, or the path as lower-case words, followed by ` (env NAME)`.
pub(crate) fn usage(path: &[&'static str], spec: &FieldSpec, env: &str) -> String {
    let phrase = match explicit(spec.help) {
        Some(help) => help.to_string(),
        None => segments(path, spec)
            .map(|s| s.to_snake_case().replace('_', " "))
            .collect::<Vec<_>>()
            .join(" "),
    };
    format!("{phrase} (env {env})")
}
