use crate::effect::TunnellingEffect;
use fnv::FnvHashMap;

/// Camera / render target an effect draws into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RenderTargetId(pub u32);

/// Effects keyed by the render target they belong to.
#[derive(Default)]
pub struct EffectRegistry {
    effects: FnvHashMap<RenderTargetId, TunnellingEffect>,
}

impl EffectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the effect previously registered for `target`, if any.
    pub fn insert(
        &mut self,
        target: RenderTargetId,
        effect: TunnellingEffect,
    ) -> Option<TunnellingEffect> {
        let old = self.effects.insert(target, effect);
        if old.is_some() {
            log::warn!(
                "[registry] more than one effect on render target {}; replacing",
                target.0
            );
        }
        old
    }

    pub fn get(&self, target: RenderTargetId) -> Option<&TunnellingEffect> {
        self.effects.get(&target)
    }

    pub fn get_mut(&mut self, target: RenderTargetId) -> Option<&mut TunnellingEffect> {
        self.effects.get_mut(&target)
    }

    pub fn remove(&mut self, target: RenderTargetId) -> Option<TunnellingEffect> {
        self.effects.remove(&target)
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&RenderTargetId, &mut TunnellingEffect)> {
        self.effects.iter_mut()
    }
}
