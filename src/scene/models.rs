//! The two imported models and how they are placed and animated.

use cgmath::{Deg, Euler, Rad};

use crate::{
    data_structures::{instance::Transform, scene_graph::SceneGraph},
    error::SceneError,
    pipelines::light::PointLight,
    resources::{self, EmissiveMode, convert_to_toon},
    scene::{
        entity::{Entity, MeshEntity, Motion},
        stage::SceneEvent,
    },
};

pub const MONKEY_PATH: &str = "models/monkey.glb";
pub const DONUT_PATH: &str = "models/donut_alone_2.glb";

/// Where a model goes once it is loaded, and what comes with it.
#[derive(Clone, Debug)]
pub struct ModelPlacement {
    pub name: &'static str,
    pub path: String,
    pub transform: Transform,
    pub motion: Motion,
    pub emissive: EmissiveMode,
    /// Inserted together with the model; absent if the load fails.
    pub light: Option<PointLight>,
}

impl ModelPlacement {
    /// Rolls gently about Z with a fixed 13° yaw and carries its own white light.
    pub fn monkey() -> Self {
        let position = [-2.0f32, 2.0, 30.0];
        let yaw = Rad::from(Deg(13.0f32));
        Self {
            name: "monkey",
            path: MONKEY_PATH.to_string(),
            transform: Transform::at(position).with_rotation(0.0, yaw.0, 0.0),
            motion: Motion::sway(yaw),
            emissive: EmissiveMode::None,
            light: Some(PointLight::white(position)),
        }
    }

    /// Large, glowing and slowly spinning about its own tilted Y axis.
    pub fn donut() -> Self {
        let base = Euler::new(Rad(0.5), Rad(0.0), Rad(0.3));
        Self {
            name: "donut",
            path: DONUT_PATH.to_string(),
            transform: Transform::at([5.0f32, 4.0, 50.0])
                .with_rotation(0.5, 0.0, 0.3)
                .with_uniform_scale(15.0),
            motion: Motion::turntable(base, 0.2),
            emissive: EmissiveMode::BaseColor,
            light: None,
        }
    }

    pub fn with_path(mut self, path: &str) -> Self {
        self.path = path.to_string();
        self
    }

    /// Converts the loaded graph to toon materials and wraps it into entities.
    pub fn into_entities(self, mut graph: SceneGraph) -> Result<Vec<Entity>, SceneError> {
        let converted = convert_to_toon(&mut graph, self.emissive);
        let model = graph.flatten();
        if model.is_empty() {
            return Err(SceneError::asset_parse(&self.path, "model has no triangles"));
        }
        log::debug!("{}: {} meshes converted to toon", self.name, converted);

        let mut entities = vec![Entity::LoadedModel(MeshEntity::new(
            self.name,
            model,
            self.transform,
            self.motion,
        ))];
        entities.extend(self.light.map(Entity::PointLight));
        Ok(entities)
    }

    /// Loads the model and reports the outcome as a [`SceneEvent`].
    pub async fn load(self) -> SceneEvent {
        let name = self.name.to_string();
        let result = match resources::load_model(&self.path).await {
            Ok(graph) => self.into_entities(graph),
            Err(error) => Err(error),
        };
        match result {
            Ok(entities) => SceneEvent::ModelLoaded { name, entities },
            Err(error) => SceneEvent::ModelFailed { name, error },
        }
    }
}
