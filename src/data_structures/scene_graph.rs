//! Scene graph of an imported model.
//!
//! Loaders produce a tree of [`SceneNode`]s, each with a local matrix and the
//! mesh parts it owns. The tree is only walked at load time: once to swap
//! materials and once to [`flatten`](SceneGraph::flatten) it into the single
//! [`ModelData`] the owning entity draws.

use cgmath::{Matrix4, SquareMatrix};

use crate::data_structures::model::{MeshPart, ModelData};

#[derive(Clone, Debug, PartialEq)]
pub struct SceneNode {
    pub name: String,
    pub local: Matrix4<f32>,
    pub meshes: Vec<MeshPart>,
    pub children: Vec<SceneNode>,
}

impl SceneNode {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            local: Matrix4::identity(),
            meshes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_local(mut self, local: Matrix4<f32>) -> Self {
        self.local = local;
        self
    }

    pub fn add_child(&mut self, child: SceneNode) {
        self.children.push(child);
    }

    fn traverse_mut(&mut self, visit: &mut dyn FnMut(&mut SceneNode)) {
        visit(self);
        for child in self.children.iter_mut() {
            child.traverse_mut(visit);
        }
    }

    fn traverse(&self, visit: &mut dyn FnMut(&SceneNode)) {
        visit(self);
        for child in &self.children {
            child.traverse(visit);
        }
    }

    fn bake_into(&self, parent: &Matrix4<f32>, out: &mut ModelData) {
        let world = parent * self.local;
        for mesh in &self.meshes {
            out.parts.push(MeshPart {
                name: mesh.name.clone(),
                geometry: mesh.geometry.clone().transformed(&world),
                material: mesh.material.clone(),
            });
        }
        for child in &self.children {
            child.bake_into(&world, out);
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SceneGraph {
    pub roots: Vec<SceneNode>,
}

impl SceneGraph {
    pub fn new(roots: Vec<SceneNode>) -> Self {
        Self { roots }
    }

    /// Depth first, parents before children.
    pub fn traverse_mut(&mut self, visit: &mut dyn FnMut(&mut SceneNode)) {
        for root in self.roots.iter_mut() {
            root.traverse_mut(visit);
        }
    }

    pub fn traverse(&self, visit: &mut dyn FnMut(&SceneNode)) {
        for root in &self.roots {
            root.traverse(visit);
        }
    }

    pub fn mesh_count(&self) -> usize {
        let mut count = 0;
        self.traverse(&mut |node| count += node.meshes.len());
        count
    }

    /// Every mesh with its node's world matrix baked into the vertices.
    pub fn flatten(&self) -> ModelData {
        let mut data = ModelData::default();
        let identity = Matrix4::identity();
        for root in &self.roots {
            root.bake_into(&identity, &mut data);
        }
        data
    }
}
