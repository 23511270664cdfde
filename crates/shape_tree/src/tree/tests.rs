use super::*;
use pretty_assertions::assert_eq;
use shape_ir::ClassRegistry;

use crate::{build_tree, TreeBuilder};

fn class(registry: &ClassRegistry, name: &str) -> ClassId {
    registry.class_by_name(name).expect("class should exist")
}

fn child_names<P: TypeMetadataProvider + ?Sized>(tree: &mut NodeTree<'_, P>, id: NodeId) -> Vec<String> {
    let children = tree.children(id).expect("children should build").to_vec();
    children
        .into_iter()
        .map(|child| tree.field_name(child).unwrap_or_default().to_owned())
        .collect()
}

#[test]
fn non_generic_children_follow_declaration_order() {
    let mut registry = ClassRegistry::with_jdk_prelude();
    let person = registry
        .register_class("org.example", "Person", &[])
        .expect("should register");
    registry.add_field_str(person, "name", "String").expect("add");
    registry.add_field_str(person, "age", "Integer").expect("add");
    registry.add_field_str(person, "tags", "List<String>").expect("add");

    let mut tree = build_tree(&registry, person, RootBindings::new()).expect("should build");
    let root = tree.root();

    assert_eq!(tree.node(root).actual_type(), person);
    assert_eq!(child_names(&mut tree, root), vec!["name", "age", "tags"]);

    let tags = tree.find_child_by_field_name(root, "tags").expect("tags");
    assert_eq!(tree.node(tags).actual_type(), class(&registry, "List"));
    assert_eq!(tree.node(tags).declaring_class_for_generics(), None);
    assert!(tree.children(tags).expect("leaf").is_empty());
}

#[test]
fn children_are_memoized() {
    let mut registry = ClassRegistry::with_jdk_prelude();
    let person = registry
        .register_class("org.example", "Person", &[])
        .expect("should register");
    let address = registry
        .register_class("org.example", "Address", &[])
        .expect("should register");
    registry.add_field_str(person, "address", "Address").expect("add");
    registry.add_field_str(address, "city", "String").expect("add");

    let mut tree = TreeBuilder::new(&registry)
        .with_config(TreeConfig::with_expansion(Expansion::Lazy))
        .build(person, RootBindings::new())
        .expect("should build");
    let root = tree.root();

    assert!(!tree.node(root).is_built());
    assert_eq!(tree.built_children(root), None);

    let first = tree.children(root).expect("build").to_vec();
    let count = tree.len();
    let second = tree.children(root).expect("memoized").to_vec();

    assert_eq!(first, second);
    assert_eq!(tree.len(), count);

    let address_node = first[0];
    assert!(!tree.node(address_node).is_built());
    assert_eq!(child_names(&mut tree, address_node), vec!["city"]);
    assert_eq!(tree.node(address_node).parent(), Some(root));
    assert_eq!(tree.parent(address_node), Some(root));
}

#[test]
fn self_reference_is_pruned() {
    let mut registry = ClassRegistry::with_jdk_prelude();
    let node = registry
        .register_class("org.example", "Node", &[])
        .expect("should register");
    registry.add_field_str(node, "next", "Node").expect("add");
    registry.add_field_str(node, "value", "String").expect("add");

    let mut tree = build_tree(&registry, node, RootBindings::new()).expect("cycle must terminate");
    let root = tree.root();

    assert_eq!(child_names(&mut tree, root), vec!["next", "value"]);
    let next = tree.find_child_by_field_name(root, "next").expect("next");
    assert!(tree.children(next).expect("built").is_empty());
    assert_eq!(tree.len(), 3);
}

#[test]
fn generic_cycle_terminates() {
    let mut registry = ClassRegistry::with_jdk_prelude();
    let tree_class = registry
        .register_class("org.example", "Tree", &["T"])
        .expect("should register");
    registry.add_field_str(tree_class, "value", "T").expect("add");
    registry
        .add_field_str(tree_class, "children", "List<Tree<T>>")
        .expect("add");
    registry
        .add_field_str(tree_class, "parent", "Tree<T>")
        .expect("add");

    let t = registry.intern("T");
    let string = class(&registry, "String");
    let mut tree = build_tree(&registry, tree_class, RootBindings::new().bind(t, string))
        .expect("cycle must terminate");
    let root = tree.root();

    let parent = tree.find_child_by_field_name(root, "parent").expect("parent");
    assert_eq!(tree.node(parent).actual_type(), tree_class);
    assert!(tree.children(parent).expect("built").is_empty());

    let value = tree.find_child_by_field_name(root, "value").expect("value");
    assert_eq!(tree.node(value).actual_type(), string);
}

#[test]
fn class_reused_with_different_arguments_is_expanded_twice() {
    let mut registry = ClassRegistry::with_jdk_prelude();
    let boxed = registry
        .register_class("org.example", "Box", &["T"])
        .expect("should register");
    registry.add_field_str(boxed, "item", "T").expect("add");
    let holder = registry
        .register_class("org.example", "Holder", &[])
        .expect("should register");
    registry.add_field_str(holder, "a", "Box<String>").expect("add");
    registry.add_field_str(holder, "b", "Box<Long>").expect("add");
    registry.add_field_str(holder, "c", "Box<String>").expect("add");

    let mut tree = build_tree(&registry, holder, RootBindings::new()).expect("should build");
    let root = tree.root();

    let a = tree.find_child_by_field_name(root, "a").expect("a");
    let b = tree.find_child_by_field_name(root, "b").expect("b");
    let c = tree.find_child_by_field_name(root, "c").expect("c");

    let a_item = tree.find_child_by_field_name(a, "item").expect("a.item");
    let b_item = tree.find_child_by_field_name(b, "item").expect("b.item");
    assert_eq!(tree.node(a_item).actual_type(), class(&registry, "String"));
    assert_eq!(tree.node(b_item).actual_type(), class(&registry, "Long"));
    assert_eq!(
        tree.node(b_item).declaring_class_for_generics(),
        Some(class(&registry, "Long"))
    );

    // Same (field, actual type) as a.item: pruned.
    assert!(tree.children(c).expect("built").is_empty());
}

#[test]
fn custom_platform_namespaces() {
    let mut registry = ClassRegistry::with_jdk_prelude();
    let money = registry
        .register_class("org.lib", "Money", &[])
        .expect("should register");
    registry.add_field_str(money, "amount", "Long").expect("add");
    let order = registry
        .register_class("org.example", "Order", &[])
        .expect("should register");
    registry.add_field_str(order, "total", "Money").expect("add");

    let mut tree = TreeBuilder::new(&registry)
        .with_config(TreeConfig::with_platform_namespaces(["java", "org.lib"]))
        .build(order, RootBindings::new())
        .expect("should build");
    let root = tree.root();
    let total = tree.find_child_by_field_name(root, "total").expect("total");
    assert!(tree.children(total).expect("leaf").is_empty());

    let mut tree = build_tree(&registry, order, RootBindings::new()).expect("should build");
    let root = tree.root();
    let total = tree.find_child_by_field_name(root, "total").expect("total");
    assert_eq!(child_names(&mut tree, total), vec!["amount"]);
}

#[test]
fn class_without_namespace_is_leaf() {
    let mut registry = ClassRegistry::with_jdk_prelude();
    let int = registry.register_class("", "int", &[]).expect("should register");
    let counter = registry
        .register_class("org.example", "Counter", &[])
        .expect("should register");
    registry.add_field_str(counter, "count", "int").expect("add");

    let mut tree = build_tree(&registry, counter, RootBindings::new()).expect("should build");
    let root = tree.root();
    let count = tree.find_child_by_field_name(root, "count").expect("count");
    assert_eq!(tree.node(count).actual_type(), int);
    assert!(tree.children(count).expect("leaf").is_empty());
}

#[test]
fn array_field_is_leaf() {
    let mut registry = ClassRegistry::with_jdk_prelude();
    let person = registry
        .register_class("org.example", "Person", &[])
        .expect("should register");
    registry.add_field_str(person, "name", "String").expect("add");
    registry.add_field_str(person, "tags", "String[]").expect("add");

    let mut tree = build_tree(&registry, person, RootBindings::new()).expect("should build");
    let root = tree.root();
    assert_eq!(child_names(&mut tree, root), vec!["name", "tags"]);

    let tags = tree.find_child_by_field_name(root, "tags").expect("tags");
    let node = tree.node(tags);
    assert_eq!(node.actual_type(), class(&registry, "String"));
    assert!(node.resolved_type().is_array());
    assert_eq!(
        node.resolved_type().display(&registry).to_string(),
        "java.lang.String[]"
    );
    assert!(node.type_var_map().is_empty());
    assert!(tree.children(tags).expect("leaf").is_empty());
}

#[test]
fn array_of_application_class_is_leaf() {
    let mut registry = ClassRegistry::with_jdk_prelude();
    let order = registry
        .register_class("org.example", "Order", &[])
        .expect("should register");
    registry.add_field_str(order, "id", "Long").expect("add");
    let customer = registry
        .register_class("org.example", "Customer", &[])
        .expect("should register");
    registry.add_field_str(customer, "orders", "Order[][]").expect("add");

    let mut tree = build_tree(&registry, customer, RootBindings::new()).expect("should build");
    let root = tree.root();
    let orders = tree.find_child_by_field_name(root, "orders").expect("orders");
    assert_eq!(tree.node(orders).actual_type(), order);
    assert_eq!(tree.node(orders).resolved_type().dimensions, 2);
    assert!(tree.children(orders).expect("leaf").is_empty());
    assert_eq!(tree.len(), 2);
}

#[test]
fn variable_bound_to_array_resolves() {
    let mut registry = ClassRegistry::with_jdk_prelude();
    let holder = registry
        .register_class("org.example", "Holder", &["T"])
        .expect("should register");
    registry.add_field_str(holder, "value", "T").expect("add");
    registry.add_field_str(holder, "values", "List<T>").expect("add");
    let outer = registry
        .register_class("org.example", "Outer", &[])
        .expect("should register");
    registry
        .add_field_str(outer, "names", "Holder<String[]>")
        .expect("add");

    let mut tree = build_tree(&registry, outer, RootBindings::new()).expect("should build");
    let root = tree.root();
    let names = tree.find_child_by_field_name(root, "names").expect("names");
    let value = tree.find_child_by_field_name(names, "value").expect("value");
    assert_eq!(tree.node(value).actual_type(), class(&registry, "String"));
    assert_eq!(tree.node(value).declaring_class_for_generics(), Some(class(&registry, "String")));
    assert_eq!(
        tree.node(value).resolved_type().display(&registry).to_string(),
        "java.lang.String[]"
    );

    let values = tree.find_child_by_field_name(names, "values").expect("values");
    let element = tree.resolve_type_argument(values, "E").expect("E");
    assert_eq!(element.display(&registry).to_string(), "java.lang.String[]");
}

#[test]
fn array_of_type_variable_fails_fast() {
    let mut registry = ClassRegistry::with_jdk_prelude();
    let holder = registry
        .register_class("org.example", "Holder", &["T"])
        .expect("should register");
    registry.add_field_str(holder, "values", "T[]").expect("add");

    let t = registry.intern("T");
    let string = class(&registry, "String");
    let err = build_tree(&registry, holder, RootBindings::new().bind(t, string)).err();
    assert_eq!(
        err,
        Some(TreeError::UnhandledTypeShape {
            ty: "T[]".to_owned(),
            site: "org.example.Holder.values".to_owned(),
        })
    );
}

#[test]
fn lazy_errors_surface_on_access() {
    let mut registry = ClassRegistry::with_jdk_prelude();
    let holder = registry
        .register_class("org.example", "Holder", &["T"])
        .expect("should register");
    registry.add_field_str(holder, "label", "String").expect("add");
    registry.add_field_str(holder, "value", "T").expect("add");
    let outer = registry
        .register_class("org.example", "Outer", &[])
        .expect("should register");
    registry.add_field_str(outer, "raw", "Holder").expect("add");

    let mut tree = TreeBuilder::new(&registry)
        .with_config(TreeConfig::with_expansion(Expansion::Lazy))
        .build(outer, RootBindings::new())
        .expect("root alone resolves");
    let root = tree.root();
    let raw = tree.find_child_by_field_name(root, "raw").expect("raw");
    assert!(tree.node(raw).type_var_map().is_empty());

    let count = tree.len();
    let expected = TreeError::UnresolvableTypeVariable {
        variable: "T".to_owned(),
        site: "org.example.Holder.value".to_owned(),
    };

    let err = tree.children(raw).expect_err("T is unbound under raw usage");
    assert_eq!(err, expected);
    // The `label` child built before the failure is rolled back.
    assert_eq!(tree.len(), count);
    assert!(!tree.node(raw).is_built());
    assert_eq!(tree.built_children(raw), None);

    let err = tree.children(raw).expect_err("retry sees the same failure");
    assert_eq!(err, expected);
    assert_eq!(tree.len(), count);

    let err = build_tree(&registry, outer, RootBindings::new()).err();
    assert!(matches!(err, Some(TreeError::UnresolvableTypeVariable { .. })));
}

#[test]
fn display_and_render() {
    let mut registry = ClassRegistry::with_jdk_prelude();
    let pair = registry
        .register_class("org.example", "Pair", &["L", "R"])
        .expect("should register");
    registry.add_field_str(pair, "left", "L").expect("add");
    registry.add_field_str(pair, "right", "List<R>").expect("add");

    let l = registry.intern("L");
    let r = registry.intern("R");
    let bindings = RootBindings::new()
        .bind(l, class(&registry, "Integer"))
        .bind(r, class(&registry, "String"));
    let mut tree = build_tree(&registry, pair, bindings).expect("should build");
    let root = tree.root();

    assert_eq!(
        tree.render(),
        "org.example.Pair<java.lang.Integer, java.lang.String>\n  \
         left: java.lang.Integer\n  \
         right: java.util.List<java.lang.String>\n"
    );

    assert_eq!(
        tree.display(root).to_string(),
        "Root: org.example.Pair\n \
         -> typeVars: [L, R]\n \
         -> resolved: org.example.Pair<java.lang.Integer, java.lang.String>\n \
         -> typeMap: {L=L, R=R}\n \
         -> nestedTypes: []\n \
         -> children: left,right\n"
    );

    let right = tree.find_child_by_field_name(root, "right").expect("right");
    assert_eq!(
        tree.display(right).to_string(),
        "Field: right java.util.List<R>, actual type: java.util.List\n \
         -> typeVars: [E]\n \
         -> resolved: java.util.List<java.lang.String>\n \
         -> typeMap: {E=R}\n \
         -> nestedTypes: []\n \
         -> children: \n"
    );
}
