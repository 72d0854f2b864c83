//=========================================================================
// Transition Queue
//=========================================================================
//
// Scenes queue stack operations here while they update. The scene
// manager applies the queue once the whole update pass is over, so the
// active set never changes under a running update.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::SceneKey;

//=== SceneTransition =====================================================

/// Scene stack operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneTransition<K: SceneKey> {
    /// Adds a scene on top of the stack.
    Push(K),

    /// Removes a scene from anywhere in the stack.
    Remove(K),

    /// Swaps a scene in place (`old`, `new`).
    Replace(K, K),

    /// Empties the stack.
    Clear,
}

//=== TransitionQueue =====================================================

#[derive(Debug)]
pub struct TransitionQueue<K: SceneKey> {
    queue: Vec<SceneTransition<K>>,
}

impl<K: SceneKey> TransitionQueue<K> {
    pub fn new() -> Self {
        Self { queue: Vec::new() }
    }

    pub fn push(&mut self, transition: SceneTransition<K>) {
        self.queue.push(transition);
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Takes every queued transition (FIFO), leaving the queue empty.
    pub fn take(&mut self) -> Vec<SceneTransition<K>> {
        std::mem::take(&mut self.queue)
    }
}

impl<K: SceneKey> Default for TransitionQueue<K> {
    fn default() -> Self {
        Self::new()
    }
}
