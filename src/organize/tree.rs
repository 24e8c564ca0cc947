use std::path::Path;

use super::planner::OutputTarget;

/// Render where a planned book lands, as a tree rooted at `output_dir`
pub fn render_tree(target: &OutputTarget, output_dir: &Path) -> String {
    let destination = target.path();
    let relative = destination.strip_prefix(output_dir).unwrap_or(&destination);

    let components: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().to_string())
        .collect();

    let mut output = String::new();
    output.push_str(&format!("{}/\n", output_dir.display()));

    let last = components.len().saturating_sub(1);
    for (depth, name) in components.iter().enumerate() {
        let indent = "    ".repeat(depth);
        if depth == last {
            output.push_str(&format!("{}└── {}\n", indent, name));
        } else {
            output.push_str(&format!("{}└── {}/\n", indent, name));
        }
    }

    output
}
