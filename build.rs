// build.rs
//
// Generates the `t!` message macro from `locales/<lang>.toml`, merged over `locales/en.toml`.
// The language is the enabled `lang_*` feature, else `PWRCTL_LANG`, else English.

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::Path;

type Messages = BTreeMap<String, String>;

const LOCALES_DIR: &str = "locales";
const FALLBACK_LANG: &str = "en";

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed={}", LOCALES_DIR);
    println!("cargo:rerun-if-env-changed=PWRCTL_LANG");

    let lang = selected_language();
    println!("cargo:rustc-env=PWRCTL_LANG_EFFECTIVE={}", lang);

    let fallback_path = locale_path(FALLBACK_LANG);
    let mut messages = read_messages(&fallback_path)
        .unwrap_or_else(|e| panic!("{}: {}", fallback_path, e));
    if lang != FALLBACK_LANG {
        merge_language(&mut messages, &lang);
    }

    let out_dir = env::var("OUT_DIR").expect("cargo sets OUT_DIR for build scripts");
    let dest = Path::new(&out_dir).join("translations.rs");
    fs::write(&dest, render_macro(&messages))
        .unwrap_or_else(|e| panic!("{}: {}", dest.display(), e));
}

fn selected_language() -> String {
    let mut from_features: Vec<String> = env::vars()
        .filter_map(|(key, _)| {
            key.strip_prefix("CARGO_FEATURE_LANG_")
                .map(str::to_lowercase)
        })
        .collect();
    from_features.sort();

    match from_features.as_slice() {
        [] => env::var("PWRCTL_LANG").unwrap_or_else(|_| FALLBACK_LANG.to_string()),
        [only] => only.clone(),
        [first, ..] => {
            println!(
                "cargo:warning=Several lang_* features are enabled ({}); using '{}'.",
                from_features.join(", "),
                first
            );
            first.clone()
        }
    }
}

fn locale_path(lang: &str) -> String {
    format!("{}/{}.toml", LOCALES_DIR, lang)
}

fn read_messages(path: &str) -> Result<Messages, String> {
    let content = fs::read_to_string(path).map_err(|e| e.to_string())?;
    toml::from_str(&content).map_err(|e| e.to_string())
}

/// Overlays one language on the fallback table. A missing file keeps English.
fn merge_language(messages: &mut Messages, lang: &str) {
    let path = locale_path(lang);
    if !Path::new(&path).is_file() {
        println!("cargo:warning={} not found; messages stay in English.", path);
        return;
    }
    let overlay = read_messages(&path).unwrap_or_else(|e| panic!("{}: {}", path, e));
    for (key, value) in overlay {
        if !messages.contains_key(&key) {
            println!("cargo:warning={}: '{}' has no English counterpart.", path, key);
        }
        messages.insert(key, value);
    }
}

/// One literal arm per key. An unknown key is a compile error at the call site.
fn render_macro(messages: &Messages) -> String {
    let mut code = String::from("#[macro_export]\nmacro_rules! t {\n");
    for (key, value) in messages {
        code.push_str(&format!("    ({:?}) => {{ {:?} }};\n", key, value));
    }
    code.push_str(
        "    ($key:expr) => { compile_error!(concat!(\"Missing translation key: \", $key)) };\n}\n",
    );
    code
}
