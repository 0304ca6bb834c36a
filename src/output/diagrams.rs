// Diagram generation for Infera
//
// Renders scan results as a Mermaid class diagram. Node and edge order
// follows discovery order; nothing is sorted here.

use crate::config::DiagramConfig;
use crate::scanner::ScanResult;

const HEADER: &str = "classDiagram";
const INDENT: &str = "    ";
/// Members are written on the node's line, separated by a literal `\n`
const MEMBER_SEPARATOR: &str = "\\n";
/// Node name used for functions declared directly in the scan root
const ROOT_MODULE: &str = "root";

/// Diagram renderer for class, inheritance and module-function nodes
pub struct DiagramRenderer {
    /// Emit synthetic nodes for module-level functions
    module_functions: bool,
    /// Appended to the directory name of a module node
    module_suffix: String,
}

impl DiagramRenderer {
    /// Create a new renderer with default settings
    pub fn new() -> Self {
        Self {
            module_functions: true,
            module_suffix: "_module".to_string(),
        }
    }

    pub fn from_config(config: &DiagramConfig) -> Self {
        Self {
            module_functions: config.module_functions,
            module_suffix: config.module_suffix.clone(),
        }
    }

    /// Toggle synthetic module nodes
    pub fn with_module_functions(mut self, enabled: bool) -> Self {
        self.module_functions = enabled;
        self
    }

    pub fn with_module_suffix(mut self, suffix: &str) -> Self {
        self.module_suffix = suffix.to_string();
        self
    }

    /// Render the full diagram text
    pub fn render(&self, scan: &ScanResult) -> String {
        let mut lines = vec![HEADER.to_string()];

        for class in scan.classes() {
            if class.has_members() {
                let members: Vec<&str> = class.members().collect();
                lines.push(format!(
                    "{}class {} {{ {} }}",
                    INDENT,
                    class.name,
                    members.join(MEMBER_SEPARATOR)
                ));
            } else {
                lines.push(format!("{}class {}", INDENT, class.name));
            }
        }

        for edge in scan.edges() {
            lines.push(format!("{}{} <|-- {}", INDENT, edge.parent, edge.child));
        }

        if self.module_functions {
            for (dir, funcs) in scan.module_functions().iter() {
                if funcs.is_empty() {
                    continue;
                }
                lines.push(format!(
                    "{}class {} {{ {} }}",
                    INDENT,
                    self.module_node_name(dir),
                    funcs.join(MEMBER_SEPARATOR)
                ));
            }
        }

        lines.join("\n")
    }

    /// Name of the synthetic node for a module-function directory
    pub fn module_node_name(&self, dir: &str) -> String {
        let base = if dir == "." || dir.is_empty() {
            ROOT_MODULE.to_string()
        } else {
            dir.replace('/', "_")
        };
        format!("{}{}", base, self.module_suffix)
    }
}

impl Default for DiagramRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_scan() -> ScanResult {
        let mut scan = ScanResult::new();
        let base = scan.declare_class("Base", "models.py");
        scan.add_method(base, "save");
        scan.add_attribute(base, "id");
        scan.declare_class("Marker", "models.py");
        scan.declare_class("User", "models.py");
        scan.add_edge("Base", "User");
        scan.add_edge("External", "Marker");
        scan.visit_dir(".");
        scan.visit_dir("pkg");
        scan.add_module_function("pkg/sub", "helper");
        scan.add_module_function("pkg/sub", "main");
        scan
    }

    #[test]
    fn test_empty_scan_renders_header_only() {
        let text = DiagramRenderer::new().render(&ScanResult::new());
        assert_eq!(text, "classDiagram");
    }

    #[test]
    fn test_render_full_diagram() {
        let text = DiagramRenderer::new().render(&sample_scan());
        let expected = [
            "classDiagram",
            "    class Base { id\\nsave }",
            "    class Marker",
            "    class User",
            "    Base <|-- User",
            "    External <|-- Marker",
            "    class pkg_sub_module { helper\\nmain }",
        ]
        .join("\n");
        assert_eq!(text, expected);
    }

    #[test]
    fn test_without_module_functions() {
        let text = DiagramRenderer::new()
            .with_module_functions(false)
            .render(&sample_scan());
        assert!(!text.contains("_module"));
        assert!(text.ends_with("External <|-- Marker"));
    }

    #[test]
    fn test_module_node_name() {
        let renderer = DiagramRenderer::new();
        assert_eq!(renderer.module_node_name("pkg/sub"), "pkg_sub_module");
        assert_eq!(renderer.module_node_name("app"), "app_module");
        assert_eq!(renderer.module_node_name("."), "root_module");
    }

    #[test]
    fn test_custom_suffix() {
        let renderer = DiagramRenderer::new().with_module_suffix("_funcs");
        assert_eq!(renderer.module_node_name("lib"), "lib_funcs");
    }

    #[test]
    fn test_from_config() {
        let config = DiagramConfig {
            module_functions: false,
            module_suffix: "_mod".to_string(),
        };
        let renderer = DiagramRenderer::from_config(&config);
        assert!(!renderer.module_functions);
        assert_eq!(renderer.module_suffix, "_mod");
    }
}
