//! Render composition.
//!
//! Flows describe what they want drawn with a [`Render`] tree each frame. The
//! engine flattens the tree into one list of [`Instanced`] draws and issues
//! them with the toon pipeline.

use crate::data_structures::model::Model;

/// A model plus the instance buffer holding `amount` transforms for it.
pub struct Instanced<'a> {
    pub instance: &'a wgpu::Buffer,
    pub model: &'a Model,
    pub amount: usize,
}

/// Specifies how a scene object should be rendered.
///
/// - `None` renders nothing (e.g. a model whose GPU upload is still pending)
/// - `Default(Instanced)` renders a single instanced object
/// - `Defaults(Vec<Instanced>)` renders a batch of instanced objects
/// - `Composed(Vec<Render>)` recursively renders a composition of renders
pub enum Render<'a> {
    None,
    Default(Instanced<'a>),
    Defaults(Vec<Instanced<'a>>),
    Composed(Vec<Render<'a>>),
}

impl<'a> Render<'a> {
    pub(crate) fn collect_into(self, draws: &mut Vec<Instanced<'a>>) {
        match self {
            Render::Default(instanced) => draws.push(instanced),
            Render::Defaults(mut vec) => draws.append(&mut vec),
            Render::Composed(renders) => renders
                .into_iter()
                .for_each(|render| render.collect_into(draws)),
            Render::None => (),
        }
    }
}
