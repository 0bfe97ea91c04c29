use super::payload::{ActionExecutionPayload, ActionGroupPayload, ActionPayload};
use super::{inherit_children, link_inheriting_child, LinkContext};
use crate::error::Result;
use crate::model::{ModelContainer, ModelStore, ModelType, NodeId};

#[derive(Debug, Clone, Copy)]
pub struct ModelActionLinker<'m> {
    ctx: LinkContext<'m>,
}

impl<'m> ModelActionLinker<'m> {
    pub fn new(ctx: LinkContext<'m>) -> Self {
        Self { ctx }
    }

    pub fn link(
        &self,
        store: &mut ModelStore,
        definition: NodeId,
        actions: &[ActionPayload],
        parent: Option<NodeId>,
    ) -> Result<()> {
        for payload in actions {
            let (action, counterpart) = link_inheriting_child(
                &self.ctx,
                store,
                definition,
                ModelContainer::Actions,
                ModelType::Action,
                &payload.id,
                &payload.attributes,
                parent,
            )?;
            ModelActionExecutionLinker::new(self.ctx).link(
                store,
                action,
                &payload.action_executions,
                counterpart,
            )?;
        }
        inherit_children(store, definition, ModelContainer::Actions, parent)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ModelActionGroupLinker<'m> {
    ctx: LinkContext<'m>,
}

impl<'m> ModelActionGroupLinker<'m> {
    pub fn new(ctx: LinkContext<'m>) -> Self {
        Self { ctx }
    }

    pub fn link(
        &self,
        store: &mut ModelStore,
        definition: NodeId,
        groups: &[ActionGroupPayload],
        parent: Option<NodeId>,
    ) -> Result<()> {
        for payload in groups {
            link_inheriting_child(
                &self.ctx,
                store,
                definition,
                ModelContainer::ActionGroups,
                ModelType::ActionGroup,
                &payload.id,
                &payload.attributes,
                parent,
            )?;
        }
        inherit_children(store, definition, ModelContainer::ActionGroups, parent)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ModelActionExecutionLinker<'m> {
    ctx: LinkContext<'m>,
}

impl<'m> ModelActionExecutionLinker<'m> {
    pub fn new(ctx: LinkContext<'m>) -> Self {
        Self { ctx }
    }

    pub fn link(
        &self,
        store: &mut ModelStore,
        action: NodeId,
        executions: &[ActionExecutionPayload],
        inherited_action: Option<NodeId>,
    ) -> Result<()> {
        for payload in executions {
            link_inheriting_child(
                &self.ctx,
                store,
                action,
                ModelContainer::ActionExecutions,
                ModelType::ActionExecution,
                &payload.id,
                &payload.attributes,
                inherited_action,
            )?;
        }
        inherit_children(store, action, ModelContainer::ActionExecutions, inherited_action)?;
        Ok(())
    }
}
