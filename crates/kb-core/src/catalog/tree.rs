//! Subcategory tree of a category's documents

use super::model::DocItem;
use serde::Serialize;

/// Group name for documents without a subcategory
pub const DEFAULT_SUBCATEGORY: &str = "其他";

/// A subcategory and its documents
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocTreeGroup {
    pub key: String,
    pub title: String,
    pub children: Vec<DocTreeLeaf>,
}

/// A document leaf, keyed by its path
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocTreeLeaf {
    pub key: String,
    pub title: String,
}

/// Group in first-appearance order; documents keep their order within a group
pub(super) fn build<'a>(docs: impl IntoIterator<Item = &'a DocItem>) -> Vec<DocTreeGroup> {
    let mut groups: Vec<DocTreeGroup> = Vec::new();
    for doc in docs {
        let name = doc.subcategory.as_deref().unwrap_or(DEFAULT_SUBCATEGORY);
        let leaf = DocTreeLeaf {
            key: doc.path.clone(),
            title: doc.title.clone(),
        };
        match groups.iter_mut().find(|g| g.key == name) {
            Some(group) => group.children.push(leaf),
            None => groups.push(DocTreeGroup {
                key: name.to_string(),
                title: name.to_string(),
                children: vec![leaf],
            }),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn doc(title: &str, sub: Option<&str>) -> DocItem {
        DocItem {
            title: title.to_string(),
            path: format!("/{}.md", title),
            category: "c".to_string(),
            subcategory: sub.map(str::to_string),
        }
    }

    #[test]
    fn test_groups_in_first_appearance_order() {
        let docs = vec![
            doc("a", Some("layout")),
            doc("b", None),
            doc("c", Some("layout")),
            doc("d", Some("motion")),
        ];
        let tree = build(&docs);
        let names: Vec<_> = tree.iter().map(|g| g.title.as_str()).collect();
        assert_eq!(names, vec!["layout", DEFAULT_SUBCATEGORY, "motion"]);
        assert_eq!(
            tree[0].children,
            vec![
                DocTreeLeaf {
                    key: "/a.md".into(),
                    title: "a".into()
                },
                DocTreeLeaf {
                    key: "/c.md".into(),
                    title: "c".into()
                },
            ]
        );
    }

    #[test]
    fn test_empty() {
        assert!(build(Vec::<&DocItem>::new()).is_empty());
    }

    #[test]
    fn test_builtin_mobile_tree() {
        let catalog = super::super::Catalog::builtin().unwrap();
        let tree = catalog.tree("mobile");
        let names: Vec<_> = tree.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(names, vec!["响应式", "适配", "跨平台开发"]);
        assert_eq!(tree[2].children.len(), 2);
    }
}
