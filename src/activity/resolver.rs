use super::files::FileSource;
use crate::config::activity_file::find_in_tree;
use crate::config::{ActionParameter, Activity, Panel, PanelDefinition, PanelLink, PanelRef, UrlRewriter};
use std::sync::Arc;

/// Links an activity in place: panel `ref`s become definitions, panel files
/// are fetched and attached, and action panel ids become the tree's own
/// panels. Anything that does not resolve is left as its string id for the
/// semantic validator to report, so this never fails.
pub struct ReferenceResolver<'a, D> {
    panel_defs: D,
    files: &'a dyn FileSource,
    rewriter: &'a UrlRewriter,
}

impl<'a, D> ReferenceResolver<'a, D>
where
    D: Fn(&str) -> Option<Arc<PanelDefinition>>,
{
    pub fn new(panel_defs: D, files: &'a dyn FileSource, rewriter: &'a UrlRewriter) -> Self {
        Self {
            panel_defs,
            files,
            rewriter,
        }
    }

    pub fn resolve(&self, activity: &mut Activity) {
        for panel in &mut activity.panels {
            self.resolve_panel(panel);
        }

        let tree = &activity.panels;
        for action in &mut activity.actions {
            self.resolve_link(tree, &mut action.source);
            self.resolve_link(tree, &mut action.output);
            if let Some(console) = action.output_console.as_mut() {
                self.resolve_link(tree, console);
            }
            for parameter in action.parameters.values_mut() {
                if let ActionParameter::Panel(link) = parameter {
                    self.resolve_link(tree, link);
                }
            }
        }
    }

    fn resolve_panel(&self, panel: &mut Arc<Panel>) {
        let panel = Arc::make_mut(panel);

        if let Some(file) = panel.file.as_deref() {
            panel.file_handle = self
                .rewriter
                .interpolate_ids(file)
                .ok()
                .and_then(|name| self.files.fetch_file(&name));
        }

        if let PanelRef::Id(def_id) = &panel.reference {
            if let Some(def) = (self.panel_defs)(def_id) {
                panel.reference = PanelRef::Definition(def);
            }
        }

        for child in &mut panel.child_panels {
            self.resolve_panel(child);
        }
    }

    fn resolve_link(&self, tree: &[Arc<Panel>], link: &mut PanelLink) {
        let resolved = match link {
            PanelLink::Id(panel_id) => find_in_tree(tree, panel_id).cloned(),
            PanelLink::Panel(panel) => match find_in_tree(tree, &panel.id) {
                Some(in_tree) if !Arc::ptr_eq(in_tree, panel) => Some(in_tree.clone()),
                Some(_) => None,
                None => {
                    self.resolve_panel(panel);
                    None
                }
            },
        };
        if let Some(panel) = resolved {
            *link = PanelLink::Panel(panel);
        }
    }
}

/// Convenience wrapper for the common case of definitions coming from a function.
pub fn resolve_activity<D>(
    activity: &mut Activity,
    panel_defs: D,
    files: &dyn FileSource,
    rewriter: &UrlRewriter,
) where
    D: Fn(&str) -> Option<Arc<PanelDefinition>>,
{
    ReferenceResolver::new(panel_defs, files, rewriter).resolve(activity);
}
