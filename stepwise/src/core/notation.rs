//! Formatting strategies for trace text.
//!
//! Engines decide *what* a trace line says; a [`Notation`] decides how symbols
//! are spelled. Numbers arrive pre-formatted, so every notation shows the same
//! digits.

pub trait Notation: Sync {
    /// Multiplication between two operands.
    fn times(&self) -> &'static str;

    /// Multiplication in a symbolic rule (`k · a₁₁`).
    fn dot(&self) -> &'static str;

    fn not_equal(&self) -> &'static str;

    /// `name` with a subscript; digits and the index letters `i`, `j`, `k`.
    fn subscripted(&self, name: &str, index: &str) -> String;

    /// Indexed entry name such as `a₁₂`.
    fn element(&self, name: &str, row: usize, col: usize) -> String {
        self.subscripted(name, &format!("{}{}", row, col))
    }

    /// Single-index name such as `v₁` or `P₃`.
    fn indexed(&self, name: &str, index: usize) -> String {
        self.subscripted(name, &index.to_string())
    }

    fn matrix(&self, cells: &[Vec<String>]) -> String;

    fn vector(&self, components: &[String; 3]) -> String;

    fn power(&self, base: &str, exponent: &str) -> String;

    fn root(&self, index: &str, radicand: &str) -> String;

    fn sqrt(&self, radicand: &str) -> String {
        self.root("2", radicand)
    }

    fn abs(&self, inner: &str) -> String {
        format!("|{}|", inner)
    }

    fn transpose(&self, name: &str) -> String;
}

/// Unicode text, readable in a terminal.
pub struct PlainText;

/// LaTeX math-mode fragments for a typesetting frontend.
pub struct Latex;

impl Notation for PlainText {
    fn times(&self) -> &'static str {
        "×"
    }

    fn dot(&self) -> &'static str {
        "·"
    }

    fn not_equal(&self) -> &'static str {
        "≠"
    }

    fn subscripted(&self, name: &str, index: &str) -> String {
        format!("{}{}", name, subscript(index))
    }

    fn matrix(&self, cells: &[Vec<String>]) -> String {
        let rows: Vec<String> = cells
            .iter()
            .map(|row| format!("[{}]", row.join(", ")))
            .collect();
        format!("[{}]", rows.join(", "))
    }

    fn vector(&self, components: &[String; 3]) -> String {
        format!("({})", components.join(", "))
    }

    fn power(&self, base: &str, exponent: &str) -> String {
        format!("{}^{}", wrap_negative(base), wrap_negative(exponent))
    }

    fn root(&self, index: &str, radicand: &str) -> String {
        let symbol = match index {
            "2" => "√".to_string(),
            "3" => "∛".to_string(),
            "4" => "∜".to_string(),
            other => format!("{}√", superscript(other)),
        };
        format!("{}({})", symbol, radicand)
    }

    fn transpose(&self, name: &str) -> String {
        format!("{}ᵀ", name)
    }
}

impl Notation for Latex {
    fn times(&self) -> &'static str {
        "\\times"
    }

    fn dot(&self) -> &'static str {
        "\\cdot"
    }

    fn not_equal(&self) -> &'static str {
        "\\neq"
    }

    fn subscripted(&self, name: &str, index: &str) -> String {
        format!("{}_{{{}}}", name, index)
    }

    fn matrix(&self, cells: &[Vec<String>]) -> String {
        let rows: Vec<String> = cells.iter().map(|row| row.join(" & ")).collect();
        format!(
            "\\begin{{bmatrix}} {} \\end{{bmatrix}}",
            rows.join(" \\\\ ")
        )
    }

    fn vector(&self, components: &[String; 3]) -> String {
        format!("\\left({}\\right)", components.join(", "))
    }

    fn power(&self, base: &str, exponent: &str) -> String {
        format!("{}^{{{}}}", wrap_negative(base), exponent)
    }

    fn root(&self, index: &str, radicand: &str) -> String {
        if index == "2" {
            format!("\\sqrt{{{}}}", radicand)
        } else {
            format!("\\sqrt[{}]{{{}}}", index, radicand)
        }
    }

    fn abs(&self, inner: &str) -> String {
        format!("\\left|{}\\right|", inner)
    }

    fn transpose(&self, name: &str) -> String {
        format!("{}^{{T}}", name)
    }
}

fn wrap_negative(text: &str) -> String {
    if text.starts_with('-') {
        format!("({})", text)
    } else {
        text.to_string()
    }
}

fn subscript(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '0' => '₀',
            '1' => '₁',
            '2' => '₂',
            '3' => '₃',
            '4' => '₄',
            '5' => '₅',
            '6' => '₆',
            '7' => '₇',
            '8' => '₈',
            '9' => '₉',
            'i' => 'ᵢ',
            'j' => 'ⱼ',
            'k' => 'ₖ',
            other => other,
        })
        .collect()
}

fn superscript(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '0' => '⁰',
            '1' => '¹',
            '2' => '²',
            '3' => '³',
            '4' => '⁴',
            '5' => '⁵',
            '6' => '⁶',
            '7' => '⁷',
            '8' => '⁸',
            '9' => '⁹',
            '-' => '⁻',
            '.' => '·',
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells() -> Vec<Vec<String>> {
        vec![
            vec!["1".to_string(), "2".to_string()],
            vec!["3".to_string(), "4".to_string()],
        ]
    }

    #[test]
    fn plain_text_spells_unicode_symbols() {
        assert_eq!(PlainText.element("a", 1, 2), "a₁₂");
        assert_eq!(PlainText.subscripted("M", "1j"), "M₁ⱼ");
        assert_eq!(PlainText.matrix(&cells()), "[[1, 2], [3, 4]]");
        assert_eq!(PlainText.root("3", "8"), "∛(8)");
        assert_eq!(PlainText.root("5", "32"), "⁵√(32)");
        assert_eq!(PlainText.power("-2", "3"), "(-2)^3");
    }

    #[test]
    fn latex_spells_commands() {
        assert_eq!(Latex.element("a", 1, 2), "a_{12}");
        assert_eq!(
            Latex.matrix(&cells()),
            "\\begin{bmatrix} 1 & 2 \\\\ 3 & 4 \\end{bmatrix}"
        );
        assert_eq!(Latex.root("2", "x"), "\\sqrt{x}");
        assert_eq!(Latex.root("3", "8"), "\\sqrt[3]{8}");
    }
}
