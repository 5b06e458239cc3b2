use crate::config::{Config, TreeLayout};
use crate::error::{HaploError, Result};
use crate::haplogroup::types::{Polymorphism, RankedResult, SearchResultTreeNode};
use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;
use std::collections::HashSet;

const POLYS_SUFFIX: &str = "_Polys";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Hg,
    Poly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PolyState {
    #[serde(rename = "found")]
    Found,
    #[serde(rename = "hetero")]
    Hetero,
    #[serde(rename = "corrected")]
    Corrected,
    #[serde(rename = "notfound")]
    NotFound,
    #[serde(rename = "notInRange")]
    NotInRange,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolyEntry {
    pub name: String,
    pub state: PolyState,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeData {
    #[serde(rename = "type")]
    pub node_type: NodeType,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub polys: Vec<PolyEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
}

impl NodeData {
    fn hg() -> Self {
        Self {
            node_type: NodeType::Hg,
            polys: Vec::new(),
            height: None,
            width: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    id: String,
    name: String,
    data: NodeData,
    children: Vec<NodeId>,
}

impl Node {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &NodeData {
        &self.data
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Merged presentation tree; node 0 is the sample root.
#[derive(Debug, Clone, PartialEq)]
pub struct PresentationTree {
    nodes: Vec<Node>,
}

impl PresentationTree {
    fn new() -> Self {
        Self {
            nodes: vec![Node {
                id: "root".to_string(),
                name: "sample".to_string(),
                data: NodeData::hg(),
                children: Vec::new(),
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.nodes.iter().position(|n| n.name == name).map(NodeId)
    }

    /// Haplogroup nodes without children, in depth-first order.
    pub fn leaves(&self) -> Vec<&str> {
        let mut leaves = Vec::new();
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            let node = self.node(id);
            if node.children.is_empty() && node.data.node_type == NodeType::Hg && id != self.root() {
                leaves.push(node.name.as_str());
            }
            stack.extend(node.children.iter().rev());
        }
        leaves
    }

    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }

    fn push(&mut self, parent: NodeId, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        self.nodes[parent.0].children.push(id);
        id
    }
}

struct NodeView<'a> {
    tree: &'a PresentationTree,
    id: NodeId,
}

impl Serialize for NodeView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let node = self.tree.node(self.id);
        let children: Vec<NodeView> = node
            .children
            .iter()
            .map(|&id| NodeView { tree: self.tree, id })
            .collect();

        let mut state = serializer.serialize_struct("Node", 4)?;
        state.serialize_field("id", &node.id)?;
        state.serialize_field("name", &node.name)?;
        state.serialize_field("data", &node.data)?;
        state.serialize_field("children", &children)?;
        state.end()
    }
}

impl Serialize for PresentationTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        NodeView {
            tree: self,
            id: self.root(),
        }
        .serialize(serializer)
    }
}

/// Combines the root-to-candidate paths of several results into one tree.
///
/// Every path step becomes a `<hg>_Polys` annotation node wrapping a `<hg>`
/// branch node. Shared prefixes are matched by name and appear once.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathTreeMerger {
    layout: TreeLayout,
}

impl PathTreeMerger {
    pub fn new(layout: TreeLayout) -> Self {
        Self { layout }
    }

    pub fn merge(&self, paths: &[&[SearchResultTreeNode]], top: Option<&RankedResult>) -> Result<PresentationTree> {
        for path in paths {
            validate_path(path)?;
        }

        let mut tree = PresentationTree::new();
        for path in paths {
            let (mut current, matched) = descend(&tree, path);
            for step in &path[matched..] {
                current = self.extend(&mut tree, current, step, top);
            }
        }
        Ok(tree)
    }

    fn extend(
        &self,
        tree: &mut PresentationTree,
        parent: NodeId,
        step: &SearchResultTreeNode,
        top: Option<&RankedResult>,
    ) -> NodeId {
        let corrected: &[Polymorphism] = top
            .map(|t| t.detailed.corrected_backmutations.as_slice())
            .unwrap_or_default();

        let mut polys: Vec<PolyEntry> = step
            .expected
            .iter()
            .map(|poly| PolyEntry {
                name: poly.to_string(),
                state: poly_state(poly, &step.found, corrected),
            })
            .collect();
        polys.extend(step.not_in_range.iter().map(|poly| PolyEntry {
            name: poly.to_string(),
            state: PolyState::NotInRange,
        }));

        let hg = step.haplogroup.name();
        let polys_name = format!("{}{}", hg, POLYS_SUFFIX);
        let height = self.layout.height_for(step.expected.len() + step.not_in_range.len());

        let polys_node = tree.push(
            parent,
            Node {
                id: polys_name.clone(),
                name: polys_name,
                data: NodeData {
                    node_type: NodeType::Poly,
                    polys,
                    height: Some(height),
                    width: Some(self.layout.node_width),
                },
                children: Vec::new(),
            },
        );

        tree.push(
            polys_node,
            Node {
                id: hg.to_string(),
                name: hg.to_string(),
                data: NodeData::hg(),
                children: Vec::new(),
            },
        )
    }
}

fn poly_state(poly: &Polymorphism, found: &[Polymorphism], corrected: &[Polymorphism]) -> PolyState {
    if found.contains(poly) {
        PolyState::Found
    } else if poly.heteroplasmy {
        PolyState::Hetero
    } else if corrected.contains(poly) {
        PolyState::Corrected
    } else {
        PolyState::NotFound
    }
}

/// Follow `path` down existing nodes; returns the deepest node reached and how
/// many path steps it covers.
fn descend(tree: &PresentationTree, path: &[SearchResultTreeNode]) -> (NodeId, usize) {
    let mut current = tree.root();
    let mut matched = 0;
    let mut i = 0;

    while matched < path.len() {
        let Some(&child) = tree.node(current).children.get(i) else {
            break;
        };
        let hg = path[matched].haplogroup.name();
        let name = tree.node(child).name.as_str();

        if name.strip_suffix(POLYS_SUFFIX) == Some(hg) {
            current = child;
            i = 0;
        } else if name == hg {
            tracing::debug!("Sharing existing branch {}", hg);
            current = child;
            i = 0;
            matched += 1;
        } else {
            i += 1;
        }
    }

    (current, matched)
}

fn validate_path(path: &[SearchResultTreeNode]) -> Result<()> {
    let mut seen = HashSet::new();
    for step in path {
        let name = step.haplogroup.name();
        if name.is_empty() {
            return Err(HaploError::MalformedPath("empty haplogroup name".to_string()));
        }
        if !seen.insert(name) {
            return Err(HaploError::MalformedPath(format!(
                "haplogroup '{}' appears twice in one path",
                name
            )));
        }
    }
    Ok(())
}

impl From<&Config> for PathTreeMerger {
    fn from(config: &Config) -> Self {
        Self::new(config.layout)
    }
}
