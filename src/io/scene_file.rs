//! Native scene format
//!
//! A scene file is a RON list of node records. Each node is written once and
//! referenced by id from its parents, so nodes shared between several parents
//! are still shared after loading. Update callbacks are behavior and are not
//! stored.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::error::{Error, Result};
use crate::gfx::camera::camera_utils::{convert_array_to_matrix4, convert_matrix4_to_array};
use crate::gfx::geometry::Geometry;
use crate::gfx::scene::{DataVariance, Light, Node, NodeKind, NodeRef, StateSet};

pub const SCENE_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct SceneFile {
    version: u32,
    root: usize,
    nodes: Vec<NodeRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
struct NodeRecord {
    id: usize,
    #[serde(default)]
    name: String,
    #[serde(default)]
    data_variance: DataVariance,
    kind: KindRecord,
    #[serde(default)]
    children: Vec<usize>,
    #[serde(default)]
    state_set: Option<StateSet>,
}

#[derive(Debug, Serialize, Deserialize)]
enum KindRecord {
    Group,
    Transform { matrix: [[f32; 4]; 4] },
    Geode { drawables: Vec<Geometry> },
    LightSource { light: Light },
}

/// Serialize the graph under `root` to a RON string
pub fn to_ron_string(root: &NodeRef) -> Result<String> {
    let mut writer = Writer::default();
    let root_id = writer.record(root);
    let file = SceneFile {
        version: SCENE_FORMAT_VERSION,
        root: root_id,
        nodes: writer.records,
    };

    let config = ron::ser::PrettyConfig::default().struct_names(true);
    Ok(ron::ser::to_string_pretty(&file, config)?)
}

/// Rebuild a graph from a RON string produced by [`to_ron_string`]
pub fn from_ron_str(content: &str, path: &Path) -> Result<NodeRef> {
    let file: SceneFile = ron::from_str(content).map_err(|source| Error::SceneParse {
        path: path.to_path_buf(),
        source,
    })?;
    build(file)
}

pub fn write_scene(root: &NodeRef, path: &Path) -> Result<()> {
    let content = to_ron_string(root)?;
    std::fs::write(path, content).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub fn read_scene(path: &Path) -> Result<NodeRef> {
    let content = std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    from_ron_str(&content, path)
}

#[derive(Default)]
struct Writer {
    ids: HashMap<usize, usize>,
    records: Vec<NodeRecord>,
}

impl Writer {
    /// Record `node` and its subtree, returning its id
    fn record(&mut self, node: &NodeRef) -> usize {
        if let Some(&id) = self.ids.get(&node.addr()) {
            return id;
        }

        let id = self.records.len();
        self.ids.insert(node.addr(), id);
        {
            let n = node.borrow();
            self.records.push(NodeRecord {
                id,
                name: n.name().to_string(),
                data_variance: n.data_variance(),
                kind: match n.kind() {
                    NodeKind::Group => KindRecord::Group,
                    NodeKind::Transform { matrix } => KindRecord::Transform {
                        matrix: convert_matrix4_to_array(*matrix),
                    },
                    NodeKind::Geode { drawables } => KindRecord::Geode {
                        drawables: drawables.clone(),
                    },
                    NodeKind::LightSource { light } => KindRecord::LightSource { light: *light },
                },
                children: Vec::new(),
                state_set: n.state_set().cloned(),
            });
        }

        let children: Vec<usize> = node.children().iter().map(|c| self.record(c)).collect();
        self.records[id].children = children;
        id
    }
}

fn build(file: SceneFile) -> Result<NodeRef> {
    if file.version > SCENE_FORMAT_VERSION {
        return Err(Error::InvalidScene(format!(
            "scene version {} is newer than supported version {}",
            file.version, SCENE_FORMAT_VERSION
        )));
    }

    let mut index = HashMap::with_capacity(file.nodes.len());
    for (i, record) in file.nodes.iter().enumerate() {
        if index.insert(record.id, i).is_some() {
            return Err(Error::InvalidScene(format!("duplicate node id {}", record.id)));
        }
    }

    for record in &file.nodes {
        for child in &record.children {
            if !index.contains_key(child) {
                return Err(Error::InvalidScene(format!(
                    "node {} references missing child {}",
                    record.id, child
                )));
            }
        }
        if matches!(record.kind, KindRecord::Geode { .. }) && !record.children.is_empty() {
            return Err(Error::InvalidScene(format!("geode {} has children", record.id)));
        }
        if let KindRecord::Geode { drawables } = &record.kind {
            for (i, geometry) in drawables.iter().enumerate() {
                geometry.validate().map_err(|e| {
                    Error::InvalidScene(format!("node {} drawable {}: {}", record.id, i, e))
                })?;
            }
        }
    }
    check_acyclic(&file.nodes, &index)?;

    let root_index = *index
        .get(&file.root)
        .ok_or_else(|| Error::InvalidScene(format!("root node {} not found", file.root)))?;

    let nodes: Vec<NodeRef> = file
        .nodes
        .iter()
        .map(|record| {
            let kind = match &record.kind {
                KindRecord::Group => NodeKind::Group,
                KindRecord::Transform { matrix } => NodeKind::Transform {
                    matrix: convert_array_to_matrix4(*matrix),
                },
                KindRecord::Geode { drawables } => NodeKind::Geode {
                    drawables: drawables.clone(),
                },
                KindRecord::LightSource { light } => NodeKind::LightSource { light: *light },
            };
            let mut node = Node::new(kind);
            node.set_name(record.name.clone());
            node.set_data_variance(record.data_variance);
            node.set_state_set(record.state_set.clone());
            NodeRef::new(node)
        })
        .collect();

    for (record, node) in file.nodes.iter().zip(&nodes) {
        for child in &record.children {
            node.add_child(&nodes[index[child]]);
        }
    }

    Ok(nodes[root_index].clone())
}

/// Reject files whose child references form a cycle
fn check_acyclic(records: &[NodeRecord], index: &HashMap<usize, usize>) -> Result<()> {
    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        New,
        Active,
        Done,
    }

    let mut marks = vec![Mark::New; records.len()];
    for start in 0..records.len() {
        if marks[start] != Mark::New {
            continue;
        }
        // (record, next child position)
        let mut stack = vec![(start, 0usize)];
        marks[start] = Mark::Active;
        while let Some((i, pos)) = stack.pop() {
            match records[i].children.get(pos) {
                Some(child_id) => {
                    stack.push((i, pos + 1));
                    let c = index[child_id];
                    match marks[c] {
                        Mark::Active => {
                            return Err(Error::InvalidScene(format!(
                                "cycle through node {}",
                                child_id
                            )))
                        }
                        Mark::New => {
                            marks[c] = Mark::Active;
                            stack.push((c, 0));
                        }
                        Mark::Done => {}
                    }
                }
                None => marks[i] = Mark::Done,
            }
        }
    }
    Ok(())
}
