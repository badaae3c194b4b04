use crate::{
    context::{Context, GPUResource},
    error::SceneError,
    pipelines::light::PointLight,
    render::Render,
    scene::entity::Entity,
};

/// Results of background work, delivered through `on_custom_events`.
pub enum SceneEvent {
    ModelLoaded {
        name: String,
        entities: Vec<Entity>,
    },
    ModelFailed {
        name: String,
        error: SceneError,
    },
}

/// The flat entity collection of a mounted scene.
///
/// Entities are built once and only ever added to: by the constructor and by
/// finished model loads. Once unmounted, late load results are dropped.
pub struct Stage {
    entities: Vec<Entity>,
    mounted: bool,
}

impl Stage {
    pub fn new(entities: Vec<Entity>) -> Self {
        Self {
            entities,
            mounted: true,
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn find(&self, name: &str) -> Option<&Entity> {
        self.entities.iter().find(|entity| entity.name() == name)
    }

    pub fn insert(&mut self, entity: Entity) {
        self.entities.push(entity);
    }

    /// Advances every entity by `dt` seconds. A failing entity keeps its last
    /// transform for this frame; the others are unaffected. Returns how many failed.
    pub fn update(&mut self, dt: f32) -> usize {
        let mut faults = 0;
        for entity in self.entities.iter_mut() {
            if let Err(e) = entity.update(dt) {
                log::warn!("Skipping frame update: {}", e);
                faults += 1;
            }
        }
        faults
    }

    /// Inserts the entities of a finished load. Returns false if nothing was
    /// inserted, either because the load failed or the stage is unmounted.
    pub fn accept_load(&mut self, event: SceneEvent) -> bool {
        if !self.mounted {
            let name = match &event {
                SceneEvent::ModelLoaded { name, .. } | SceneEvent::ModelFailed { name, .. } => name,
            };
            log::debug!("Discarding load result for {} after unmount", name);
            return false;
        }
        match event {
            SceneEvent::ModelLoaded { name, entities } => {
                log::info!("Model {} ready ({} entities)", name, entities.len());
                self.entities.extend(entities);
                true
            }
            SceneEvent::ModelFailed { name, error } => {
                log::error!("Model {} left out of the scene: {}", name, error);
                false
            }
        }
    }

    pub fn unmount(&mut self) {
        self.mounted = false;
    }

    pub fn lights(&self) -> Vec<PointLight> {
        self.entities
            .iter()
            .filter_map(Entity::as_light)
            .copied()
            .collect()
    }

    pub fn write_to_buffers(&mut self, ctx: &Context) {
        self.entities
            .iter_mut()
            .for_each(|entity| entity.write_to_buffer(ctx));
    }

    pub fn get_render<'a>(&'a self) -> Render<'a> {
        Render::Composed(self.entities.iter().map(|entity| entity.get_render()).collect())
    }
}
