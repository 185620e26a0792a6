use std::path::Path;

use anyhow::{Context, Result};

/// A shader file split into its vertex and fragment WGSL sections.
#[derive(Debug, Clone, PartialEq)]
pub struct ShaderSource {
    pub vertex: String,
    pub fragment: String,
}

#[derive(Copy, Clone, Eq, PartialEq)]
enum Section {
    None,
    Vertex,
    Fragment,
}

impl ShaderSource {
    /// Parses the directive-delimited format.
    ///
    /// `#shader vertex` / `#shader fragment` open a section; subsequent
    /// lines belong to it until the next directive or EOF. Lines before the
    /// first directive are discarded. Both sections must be present — a
    /// program needs both stages.
    pub fn parse(text: &str) -> Result<Self> {
        let mut vertex = String::new();
        let mut fragment = String::new();
        let mut section = Section::None;

        for line in text.lines() {
            if line.contains("#shader") {
                if line.contains("vertex") {
                    section = Section::Vertex;
                } else if line.contains("fragment") {
                    section = Section::Fragment;
                } else {
                    log::warn!("unrecognized shader directive: {line:?}");
                    section = Section::None;
                }
                continue;
            }

            match section {
                Section::None => {}
                Section::Vertex => {
                    vertex.push_str(line);
                    vertex.push('\n');
                }
                Section::Fragment => {
                    fragment.push_str(line);
                    fragment.push('\n');
                }
            }
        }

        anyhow::ensure!(!vertex.is_empty(), "shader source has no vertex section");
        anyhow::ensure!(!fragment.is_empty(), "shader source has no fragment section");

        Ok(Self { vertex, fragment })
    }

    /// Reads and parses a shader file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read shader file {}", path.display()))?;
        Self::parse(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_SECTIONS: &str = "\
#shader vertex
fn vs() {}
#shader fragment
fn fs() {}
";

    #[test]
    fn splits_vertex_and_fragment_sections() {
        let src = ShaderSource::parse(TWO_SECTIONS).unwrap();
        assert_eq!(src.vertex, "fn vs() {}\n");
        assert_eq!(src.fragment, "fn fs() {}\n");
    }

    #[test]
    fn lines_before_first_directive_are_discarded() {
        let text = format!("// preamble\nconst X = 1;\n{TWO_SECTIONS}");
        let src = ShaderSource::parse(&text).unwrap();
        assert!(!src.vertex.contains("preamble"));
        assert!(!src.vertex.contains("X"));
    }

    #[test]
    fn section_runs_until_next_directive() {
        let text = "\
#shader vertex
line one
line two
#shader fragment
line three
";
        let src = ShaderSource::parse(text).unwrap();
        assert_eq!(src.vertex, "line one\nline two\n");
        assert_eq!(src.fragment, "line three\n");
    }

    #[test]
    fn missing_section_is_an_error() {
        assert!(ShaderSource::parse("#shader vertex\nfn vs() {}\n").is_err());
        assert!(ShaderSource::parse("plain wgsl, no directives\n").is_err());
    }
}
