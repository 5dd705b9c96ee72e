//! Scene source sanitizer
//!
//! Swaps LaTeX-backed Manim calls for plain `Text` rendering so scenes render
//! without a TeX installation. This is literal substring replacement; the
//! source is never parsed.

/// Ordered `(from, to)` rewrite rules
///
/// `Tex(` runs first and is also a suffix of `MathTex(`, so `MathTex(x)`
/// becomes `MathText(x)` and the second rule never fires.
pub const REPLACEMENTS: &[(&str, &str)] = &[
    ("Tex(", "Text("),
    ("MathTex(", "Text("),
    ("get_graph_label(", "get_text_label("),
];

/// Call markers that require a TeX installation
pub const TYPESETTING_MARKERS: &[&str] = &["Tex(", "MathTex("];

const HELPER_CALL: &str = "get_text_label";

const HELPER_DEFINITION: &str = "def get_text_label(";

const HELPER: &str = r#"
from manim import Text

def get_text_label(axes, graph, label="Label", x_val=None):
    txt = Text(label, font_size=28)
    txt.next_to(graph, UP)
    return txt
"#;

/// Rewrites `source` so it no longer needs LaTeX
///
/// Applies [`REPLACEMENTS`] in order, then prepends the `get_text_label`
/// helper when the result calls it and does not define it yet.
pub fn sanitize(source: &str) -> String {
    let mut code = source.to_string();

    for (from, to) in REPLACEMENTS {
        if code.contains(from) {
            code = code.replace(from, to);
        }
    }

    if code.contains(HELPER_CALL) && !code.contains(HELPER_DEFINITION) {
        code = format!("{}\n{}", HELPER, code);
    }

    code
}

/// Whether `source` contains any LaTeX-backed call
pub fn uses_typesetting(source: &str) -> bool {
    TYPESETTING_MARKERS.iter().any(|marker| source.contains(marker))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENE: &str = r#"from manim import *

class GeneratedScene(Scene):
    def construct(self):
        title = Tex("Hello")
        formula = MathTex(r"E = mc^2")
        axes = Axes()
        graph = axes.plot(lambda x: x ** 2)
        label = axes.get_graph_label(graph, "x^2")
        self.play(Write(title), Write(formula), Create(graph), Write(label))
"#;

    #[test]
    fn test_removes_all_typesetting_markers() {
        let sanitized = sanitize(SCENE);

        assert!(!sanitized.contains("Tex("));
        assert!(!sanitized.contains("MathTex("));
        assert!(!sanitized.contains("get_graph_label("));
        assert!(!uses_typesetting(&sanitized));
    }

    #[test]
    fn test_is_idempotent() {
        let once = sanitize(SCENE);
        let twice = sanitize(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_prepends_helper_once() {
        let sanitized = sanitize(SCENE);

        assert!(sanitized.starts_with("\nfrom manim import Text\n"));
        assert_eq!(sanitized.matches(HELPER_DEFINITION).count(), 1);
        assert!(sanitized.contains("axes.get_text_label(graph, \"x^2\")"));
    }

    #[test]
    fn test_leaves_plain_text_scenes_untouched() {
        let source = "from manim import *\n\nclass GeneratedScene(Scene):\n    def construct(self):\n        self.play(Write(Text(\"hi\")))\n";
        assert_eq!(sanitize(source), source);
    }

    #[test]
    fn test_math_tex_becomes_math_text() {
        // Tex( is rewritten before MathTex( gets a chance to match.
        assert_eq!(sanitize("MathTex(\"x\")"), "MathText(\"x\")");
    }

    #[test]
    fn test_rewrites_unrelated_identifiers_ending_in_tex() {
        let source = "def MyTex(value):\n    return value\nMyTex(1)\n";
        assert_eq!(
            sanitize(source),
            "def MyText(value):\n    return value\nMyText(1)\n"
        );
    }

    #[test]
    fn test_rewrites_inside_string_literals() {
        assert_eq!(sanitize("print('Tex(')"), "print('Text(')");
    }

    #[test]
    fn test_helper_not_prepended_when_already_defined() {
        let source = "def get_text_label(a, b):\n    pass\nget_text_label(1, 2)\n";
        assert_eq!(sanitize(source), source);
    }

    #[test]
    fn test_uses_typesetting() {
        assert!(uses_typesetting("Tex(\"a\")"));
        assert!(uses_typesetting("MathTex(\"a\")"));
        assert!(!uses_typesetting("Text(\"a\")"));
    }
}
