use crate::device::ShaderStage;

/// Token that starts a section directive line, e.g. `#shader vertex`.
pub const SECTION_MARKER: &str = "#shader";

/// Vertex and fragment sources split out of one `.shader` file.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct ShaderSource {
    pub vertex: String,
    pub fragment: String,
}

impl ShaderSource {
    pub fn stage(&self, stage: ShaderStage) -> &str {
        match stage {
            ShaderStage::Vertex => &self.vertex,
            ShaderStage::Fragment => &self.fragment,
        }
    }
}

/// Splits a combined shader file into its two stages.
///
/// A line containing [`SECTION_MARKER`] together with `vertex` or `fragment`
/// switches the active section; a marker line naming neither is dropped and
/// keeps the current section. Every other line is appended to the active
/// section with a trailing `\n`. Lines before the first directive are ignored.
pub fn parse_shader_source(text: &str) -> ShaderSource {
    let mut out = ShaderSource::default();
    let mut active: Option<ShaderStage> = None;

    for line in text.lines() {
        if line.contains(SECTION_MARKER) {
            if line.contains("vertex") {
                active = Some(ShaderStage::Vertex);
            } else if line.contains("fragment") {
                active = Some(ShaderStage::Fragment);
            }
            continue;
        }

        let section = match active {
            Some(ShaderStage::Vertex) => &mut out.vertex,
            Some(ShaderStage::Fragment) => &mut out.fragment,
            None => continue,
        };
        section.push_str(line);
        section.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASIC: &str = "\
#shader vertex
#version 330 core
layout(location = 0) in vec4 position;
void main() { gl_Position = position; }
#shader fragment
layout(location = 0) out vec4 color;
void main() { color = vec4(1.0); }
";

    #[test]
    fn splits_three_vertex_and_two_fragment_lines() {
        let src = parse_shader_source(BASIC);

        assert_eq!(src.vertex.lines().count(), 3);
        assert_eq!(src.fragment.lines().count(), 2);
        assert!(src.vertex.starts_with("#version 330 core\n"));
        assert!(src.vertex.ends_with("}\n"));
        assert_eq!(
            src.fragment,
            "layout(location = 0) out vec4 color;\nvoid main() { color = vec4(1.0); }\n"
        );
    }

    #[test]
    fn directives_plus_bodies_reconstruct_the_file() {
        let src = parse_shader_source(BASIC);
        let rebuilt = format!(
            "#shader vertex\n{}#shader fragment\n{}",
            src.stage(ShaderStage::Vertex),
            src.stage(ShaderStage::Fragment)
        );
        assert_eq!(rebuilt, BASIC);
    }

    #[test]
    fn preamble_before_first_directive_is_dropped() {
        let src = parse_shader_source("// header comment\n\n#shader fragment\nvoid main() {}\n");
        assert!(src.vertex.is_empty());
        assert_eq!(src.fragment, "void main() {}\n");
    }

    #[test]
    fn unknown_directive_keeps_active_section() {
        let src = parse_shader_source("#shader vertex\na\n#shader geometry\nb\n");
        assert_eq!(src.vertex, "a\nb\n");
        assert!(src.fragment.is_empty());
    }

    #[test]
    fn sections_may_repeat_and_append() {
        let src = parse_shader_source("#shader vertex\na\n#shader fragment\nb\n#shader vertex\nc\n");
        assert_eq!(src.vertex, "a\nc\n");
        assert_eq!(src.fragment, "b\n");
    }

    #[test]
    fn crlf_input_and_missing_final_newline() {
        let src = parse_shader_source("#shader vertex\r\nx;\r\n#shader fragment\r\ny;");
        assert_eq!(src.vertex, "x;\n");
        assert_eq!(src.fragment, "y;\n");
    }

    #[test]
    fn empty_input_yields_empty_sections() {
        assert_eq!(parse_shader_source(""), ShaderSource::default());
    }
}
