//! Path-based lexer and storage-family dispatch.
//!
//! Grounded on `get_lexer()` in the original lexer module. Two distinct
//! questions are answered here and must not be conflated (spec §4.1/§4.5):
//! which token rule set tokenizes a blob's *bytes* (five lexer families,
//! including Gas), versus which single-letter *storage* family a path
//! contributes definitions/references under (`{C, K, D, M}` only — Gas
//! assembly is tokenized for reference-candidate extraction but carries no
//! storage family of its own, and `B` is assigned directly by the
//! DT-binding-docs extractor rather than derived from a path).

use super::engine::Rule;
use super::{c, dts, gas, kconfig, make};
use crate::types::Family;

fn split_name_ext(path: &str) -> (String, String) {
    let filename = path.rsplit('/').next().unwrap_or(path).to_lowercase();
    // Leading dots (dotfiles) never start an extension, matching `os.path.splitext`.
    let stripped = filename.trim_start_matches('.');
    let ext = stripped.rfind('.').map(|idx| stripped[idx + 1..].to_string()).unwrap_or_default();
    (filename, ext)
}

/// Architecture hint for a Gas blob: the path component right after an
/// `arch/` segment, or `"generic"` if there is none.
pub fn gas_arch(path: &str) -> String {
    let mut parts = path.split('/');
    while let Some(part) = parts.next() {
        if part == "arch" {
            if let Some(arch) = parts.next() {
                return arch.to_string();
            }
        }
    }
    "generic".to_string()
}

/// The token rule set that should lex `path`'s contents, if any.
pub fn rules_for_path(path: &str) -> Option<&'static [Rule]> {
    let (filename, ext) = split_name_ext(path);

    if matches!(ext.as_str(), "c" | "h" | "cpp" | "hpp" | "c++" | "cxx" | "cc") {
        return Some(c::rules());
    }
    if filename == "makefile" || filename == "gnumakefile" {
        return Some(make::rules());
    }
    if matches!(ext.as_str(), "dts" | "dtsi") {
        return Some(dts::rules());
    }
    if ext == "s" {
        return Some(gas::rules_for_arch(&gas_arch(path)));
    }
    if filename.starts_with("kconfig") && ext != "rst" {
        return Some(kconfig::rules());
    }
    None
}

/// The storage family a path contributes definitions/references under.
/// `Gas` blobs return `None`: they are lexed (see [`rules_for_path`]) but
/// excluded from the closed `{C, K, D, M}` set `defs`/`docs`/`comps`
/// extraction keys off (spec §4.4/§4.5). `B` is never derived here.
pub fn storage_family(path: &str) -> Option<Family> {
    let (filename, ext) = split_name_ext(path);

    if matches!(ext.as_str(), "c" | "h" | "cpp" | "hpp" | "c++" | "cxx" | "cc") {
        return Some(Family::C);
    }
    if filename == "makefile" || filename == "gnumakefile" {
        return Some(Family::M);
    }
    if matches!(ext.as_str(), "dts" | "dtsi") {
        return Some(Family::D);
    }
    if filename.starts_with("kconfig") && ext != "rst" {
        return Some(Family::K);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn c_family_extensions() {
        for ext in ["c", "h", "cpp", "hpp", "cc"] {
            assert_eq!(storage_family(&format!("foo.{ext}")), Some(Family::C));
            assert!(rules_for_path(&format!("foo.{ext}")).is_some());
        }
    }

    #[test]
    fn makefile_by_name_not_extension() {
        assert_eq!(storage_family("Makefile"), Some(Family::M));
        assert_eq!(storage_family("arch/arm/Makefile"), Some(Family::M));
    }

    #[test]
    fn gas_has_no_storage_family_but_does_lex() {
        assert_eq!(storage_family("arch/arm/kernel/head.S"), None);
        assert!(rules_for_path("arch/arm/kernel/head.S").is_some());
    }

    #[test]
    fn gas_arch_derived_from_path_prefix() {
        assert_eq!(gas_arch("arch/arm/kernel/head.S"), "arm");
        assert_eq!(gas_arch("lib/memcpy.S"), "generic");
    }

    #[test]
    fn kconfig_rst_is_excluded() {
        assert_eq!(storage_family("drivers/usb/Kconfig.rst"), None);
        assert_eq!(storage_family("drivers/usb/Kconfig"), Some(Family::K));
    }

    #[test]
    fn unrecognized_extension_has_no_lexer_or_family() {
        assert!(rules_for_path("README.md").is_none());
        assert_eq!(storage_family("README.md"), None);
    }
}
