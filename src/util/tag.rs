//! Normalization of tool names and versions into Docker-tag/label-safe components.
//!
//! Rules (applied to the lowercased, trimmed input):
//! - `[a-z0-9]` and `.` pass through.
//! - `+ @ : / _ -` become `-`; a run of them collapses to one `-`.
//! - Everything else is dropped.
//! - Leading/trailing `-` are stripped.
//!
//! The sanitizer never invents a fallback; callers substitute "tool"/"latest" themselves.

pub const FALLBACK_NAME: &str = "tool";
pub const FALLBACK_VERSION: &str = "latest";

fn is_separator(c: char) -> bool {
    matches!(c, '+' | '@' | ':' | '/' | '_' | '-')
}

pub fn sanitize_tag_component(value: &str) -> String {
    let lowered = value.trim().to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    let mut last_hyphen = false;

    for c in lowered.chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '.' {
            out.push(c);
            last_hyphen = false;
        } else if is_separator(c) {
            // `@` after `:` (scoped npm packages) still yields a single hyphen.
            if !last_hyphen {
                out.push('-');
                last_hyphen = true;
            }
        }
    }

    out.trim_matches('-').to_string()
}

/// Image-tag flavour of the sanitizer. `@` always ends up as exactly one `-`, also next
/// to `:`; the shared separator collapse already guarantees that, so both agree.
pub fn sanitize_image_tag_component(value: &str) -> String {
    sanitize_tag_component(value)
}

/// Sanitized `(name, version)` for an image tag, with fallbacks applied.
pub fn image_tag_pair(name: &str, version: &str) -> (String, String) {
    let n = sanitize_image_tag_component(name);
    let v = sanitize_image_tag_component(version);
    (
        if n.is_empty() { FALLBACK_NAME.to_string() } else { n },
        if v.is_empty() { FALLBACK_VERSION.to_string() } else { v },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passes_through_alnum_and_dots() {
        assert_eq!(sanitize_tag_component("node"), "node");
        assert_eq!(sanitize_tag_component("20.11.0"), "20.11.0");
        assert_eq!(sanitize_tag_component("  Python  "), "python");
    }

    #[test]
    fn separators_collapse_to_single_hyphen() {
        assert_eq!(sanitize_tag_component("npm:@openai/codex"), "npm-openai-codex");
        assert_eq!(sanitize_tag_component("a@:b"), "a-b");
        assert_eq!(sanitize_tag_component("a:@b"), "a-b");
        assert_eq!(sanitize_tag_component("21.0.1-tem"), "21.0.1-tem");
        assert_eq!(sanitize_tag_component("a__b--c"), "a-b-c");
        assert_eq!(sanitize_tag_component("1.0+build_7"), "1.0-build-7");
    }

    #[test]
    fn strips_edge_hyphens_and_drops_other_chars() {
        assert_eq!(sanitize_tag_component("@scope/"), "scope");
        assert_eq!(sanitize_tag_component("--x--"), "x");
        assert_eq!(sanitize_tag_component("ver$ion!"), "verion");
        assert_eq!(sanitize_tag_component("~>3"), "3");
        assert_eq!(sanitize_tag_component("@@@"), "");
        assert_eq!(sanitize_tag_component(""), "");
    }

    #[test]
    fn dropped_chars_do_not_break_collapse() {
        // `$` is dropped, so the hyphens on either side are still adjacent in the output run.
        assert_eq!(sanitize_tag_component("a-$-b"), "a-b");
    }

    #[test]
    fn idempotent_and_edge_hyphen_free_over_samples() {
        let samples = [
            "npm:@google/gemini-cli",
            "  -Lead/Trail_ ",
            "a@:b::c//d",
            "Ünïcödé-1.2",
            "...",
            "-",
            "x+y@z:w/v_u-t",
            "ruby 3.3.0",
            "\"quoted\"",
        ];
        for s in samples {
            let once = sanitize_tag_component(s);
            assert_eq!(sanitize_tag_component(&once), once, "not idempotent for {s:?}");
            assert!(!once.starts_with('-') && !once.ends_with('-'), "edge hyphen for {s:?}: {once}");
            assert!(!once.contains("--"), "double hyphen for {s:?}: {once}");
        }
    }

    #[test]
    fn every_short_string_sanitizes_cleanly() {
        const ALPHABET: [char; 10] = ['a', '.', '-', '@', ':', '/', '_', '+', '$', ' '];
        let mut inputs = vec![String::new()];
        let mut frontier = vec![String::new()];
        for _ in 0..4 {
            frontier = frontier
                .iter()
                .flat_map(|p| ALPHABET.iter().map(move |c| format!("{p}{c}")))
                .collect();
            inputs.extend(frontier.iter().cloned());
        }
        assert_eq!(inputs.len(), 1 + 10 + 100 + 1_000 + 10_000);

        for s in &inputs {
            let once = sanitize_tag_component(s);
            assert_eq!(sanitize_tag_component(&once), once, "not idempotent for {s:?}");
            assert!(!once.starts_with('-') && !once.ends_with('-'), "edge hyphen for {s:?}: {once}");
            assert!(!once.contains("--"), "double hyphen for {s:?}: {once}");
            assert!(once.chars().all(|c| matches!(c, 'a' | '.' | '-')), "{s:?}: {once}");
            assert_eq!(sanitize_image_tag_component(s), once, "{s:?}");
        }
    }

    #[test]
    fn image_tag_variant_matches_label_variant() {
        for s in ["npm:@openai/codex", "a:@b", "@x@", "Node", "3.12.0+local"] {
            assert_eq!(sanitize_image_tag_component(s), sanitize_tag_component(s), "{s:?}");
        }
        assert_eq!(sanitize_image_tag_component("npm:@openai/codex"), "npm-openai-codex");
    }

    #[test]
    fn image_tag_pair_applies_fallbacks() {
        assert_eq!(image_tag_pair("!!", ""), ("tool".to_string(), "latest".to_string()));
        assert_eq!(
            image_tag_pair("Node", "v20"),
            ("node".to_string(), "v20".to_string())
        );
    }
}
