//! Integration tests for management derivation across a dependency tree.
//!
//! These tests drive the public API the way a resolver would: derive one
//! snapshot per node, query it for every child, and expand whole trees with
//! the reference collector.

use depmgr::collector::{Collector, Traversal, parse_tree};
use depmgr::core::{DependencyNode, Exclusion};
use depmgr::management::{DependencyManager, ManagementPreset};
use depmgr::scope::{LabelSetScopeHandler, LegacySystemScopeHandler, SystemScopeHandler};
use depmgr::test_utils::{dep, init_test_logging, managed_exclusions, managed_version, root_manager};
use std::sync::Arc;

/// The nearest declaration keeps winning even when a deeper node redeclares it.
#[test]
fn test_nearest_version_survives_deeper_redeclaration() {
    init_test_logging(None);

    let root = root_manager(ManagementPreset::Default);
    let depth1 = root.derive_child(&[managed_version("g:a", "2.0")]);
    assert_eq!(depth1.depth(), 1);

    let management = depth1.manage(&dep("g:a", "compile")).expect("managed at depth 1");
    assert_eq!(management.version.as_deref(), Some("2.0"));

    let depth2 = depth1.derive_child(&[managed_version("g:a", "3.0")]);
    assert_eq!(depth2.depth(), 2);

    let management = depth2.manage(&dep("g:a:1.5", "compile")).expect("managed at depth 2");
    assert_eq!(management.version.as_deref(), Some("2.0"));
}

/// Siblings derived from one parent do not see each other's declarations.
#[test]
fn test_sibling_subtrees_are_isolated() {
    let parent = root_manager(ManagementPreset::Default).derive_child(&[]);

    let left = parent.derive_child(&[managed_version("g:x", "1.0")]);
    let right = parent.derive_child(&[managed_exclusions("g:x", &["bad:lib"])]);

    let left_management = left.manage(&dep("g:x:0.1", "compile")).expect("left manages g:x");
    assert_eq!(left_management.version.as_deref(), Some("1.0"));
    assert!(left_management.exclusions.is_none());

    let right_management = right.manage(&dep("g:x:0.1", "compile")).expect("right manages g:x");
    assert!(right_management.version.is_none());
    assert!(right_management.exclusions.expect("exclusions").contains(&Exclusion::new("bad", "lib")));

    assert!(parent.manage(&dep("g:x:0.1", "compile")).is_none());
}

/// One snapshot can be shared by many threads while children are derived.
#[test]
fn test_snapshot_is_shared_across_threads() {
    let shared = root_manager(ManagementPreset::Default).derive_child(&[managed_version("g:a", "2.0")]);

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let shared = &shared;
                scope.spawn(move || {
                    let declared = format!("{}.0", i + 10);
                    let child = shared.derive_child(&[managed_version("g:a", &declared)]);
                    let management = child.manage(&dep("g:a", "compile")).expect("managed");
                    management.version
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().expect("thread panicked").as_deref(), Some("2.0"));
        }
    });

    assert_eq!(shared.depth(), 1);
}

/// The classic preset ignores declarations below the direct dependencies and
/// leaves direct dependencies alone.
#[test]
fn test_classic_preset_thresholds() {
    let root = root_manager(ManagementPreset::Classic);
    let direct = root.derive_child(&[managed_version("g:a", "2.0")]);
    assert!(direct.manage(&dep("g:a:1.0", "compile")).is_none());

    let transitive = direct.derive_child(&[managed_version("g:b", "9.0")]);
    assert_eq!(
        transitive.manage(&dep("g:a:1.0", "compile")).and_then(|m| m.version).as_deref(),
        Some("2.0")
    );

    let deeper = transitive.derive_child(&[managed_version("g:c", "7.0")]);
    assert!(deeper.manage(&dep("g:c:1.0", "compile")).is_none());
    assert_eq!(
        deeper.manage(&dep("g:b:1.0", "compile")).and_then(|m| m.version).as_deref(),
        Some("9.0")
    );
    assert_eq!(deeper.depth(), 3);
}

/// Deprecated constructor is the default preset with the legacy scope policy.
#[test]
#[allow(deprecated)]
fn test_legacy_constructor_matches_default_preset() {
    let legacy = DependencyManager::legacy();
    let default = DependencyManager::apply_everywhere(LegacySystemScopeHandler::shared());
    assert_eq!(legacy, default);
    assert_ne!(legacy, DependencyManager::classic(LegacySystemScopeHandler::shared()));

    let declarations = [managed_version("g:a", "1")];
    let child = legacy.derive_child(&declarations);
    assert_eq!(child, default.derive_child(&declarations));
    assert_eq!(child.manage(&dep("g:a:0.1", "compile")).and_then(|m| m.version).as_deref(), Some("1"));
}

const TREE: &str = r#"
[root]
managed = [
    { group = "org.slf4j", artifact = "slf4j-api", version = "2.0.9" },
    { group = "com.sun", artifact = "tools", scope = "host", system_path = "/opt/jdk/lib/tools.jar" },
]

[[root.children]]
group = "org.example"
artifact = "app-core"
version = "1.0"
scope = "compile"
exclusions = ["commons-logging:commons-logging"]
managed = [{ group = "org.slf4j", artifact = "slf4j-api", version = "1.7.36" }]

[[root.children.children]]
group = "org.slf4j"
artifact = "slf4j-api"
version = "1.7.30"
scope = "compile"

[[root.children.children]]
group = "commons-logging"
artifact = "commons-logging"
version = "1.2"
scope = "compile"

[[root.children.children]]
group = "com.sun"
artifact = "tools"
version = "1.8"
scope = "compile"

[[root.children]]
group = "org.example"
artifact = "app-web"
version = "1.0"
scope = "runtime"

[[root.children.children]]
group = "org.slf4j"
artifact = "slf4j-api"
scope = "runtime"
"#;

fn parsed_tree(handler: &dyn SystemScopeHandler) -> DependencyNode {
    parse_tree(TREE, handler).expect("tree parses")
}

/// All three traversal orders produce the same managed tree.
#[test]
fn test_traversal_orders_agree_on_file_tree() {
    init_test_logging(None);

    let handler: Arc<dyn SystemScopeHandler> = Arc::new(LabelSetScopeHandler::new(["host"], "localPath"));
    let tree = parsed_tree(handler.as_ref());

    for preset in [ManagementPreset::Default, ManagementPreset::Transitive, ManagementPreset::Classic] {
        let collector = Collector::new(DependencyManager::new(preset, handler.clone()));
        let depth_first = collector.collect(&tree, Traversal::DepthFirst);
        let breadth_first = collector.collect(&tree, Traversal::BreadthFirst);
        let parallel = collector.collect(&tree, Traversal::Parallel);

        assert_eq!(depth_first, breadth_first, "bfs differs for {preset}");
        assert_eq!(depth_first, parallel, "parallel differs for {preset}");
    }
}

/// Management from the root reaches the file tree's grandchildren, and
/// exclusions on the way down prune the tree.
#[test]
fn test_file_tree_management() {
    let handler: Arc<dyn SystemScopeHandler> = Arc::new(LabelSetScopeHandler::new(["host"], "localPath"));
    let tree = parsed_tree(handler.as_ref());
    let collector = Collector::new(DependencyManager::new(ManagementPreset::Default, handler));

    let resolved = collector.collect(&tree, Traversal::DepthFirst);
    assert_eq!(resolved.len(), 2);

    let core = &resolved[0];
    assert_eq!(core.children.len(), 2, "commons-logging is excluded");

    let slf4j = &core.children[0];
    assert_eq!(slf4j.dependency.artifact.version, "2.0.9");
    assert_eq!(slf4j.premanaged_version.as_deref(), Some("1.7.30"));
    assert_eq!(slf4j.depth, 2);

    let tools = &core.children[1];
    assert_eq!(tools.dependency.scope, "host");
    assert!(tools.system);
    assert_eq!(tools.dependency.artifact.property("localPath"), Some("/opt/jdk/lib/tools.jar"));

    let web_slf4j = &resolved[1].children[0];
    assert_eq!(web_slf4j.dependency.artifact.version, "2.0.9");
    assert_eq!(web_slf4j.premanaged_version.as_deref(), Some(""));
}

/// With the transitive preset the direct dependencies keep their declarations.
#[test]
fn test_transitive_preset_leaves_direct_dependencies() {
    let handler = LegacySystemScopeHandler::shared();
    let tree = DependencyNode::root()
        .with_managed(managed_version("g:direct", "9.9"))
        .with_child(
            DependencyNode::new(dep("g:direct:1.0", "compile"))
                .with_child(DependencyNode::new(dep("g:direct:0.5", "compile"))),
        );

    let collector = Collector::new(DependencyManager::transitive(handler));
    let resolved = collector.collect(&tree, Traversal::BreadthFirst);

    assert_eq!(resolved[0].dependency.artifact.version, "1.0");
    assert!(!resolved[0].managed.any());
    assert_eq!(resolved[0].children[0].dependency.artifact.version, "9.9");
}
