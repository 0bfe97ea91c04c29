use super::payload::{ControlParamPayload, ControlPayload};
use super::{inherit_children, link_inheriting_child, LinkContext};
use crate::error::Result;
use crate::model::{ModelContainer, ModelStore, ModelType, NodeId};

#[derive(Debug, Clone, Copy)]
pub struct ModelControlLinker<'m> {
    ctx: LinkContext<'m>,
}

impl<'m> ModelControlLinker<'m> {
    pub fn new(ctx: LinkContext<'m>) -> Self {
        Self { ctx }
    }

    /// Link controls of `field`; `inherited_field` is the field it overrides.
    pub fn link(
        &self,
        store: &mut ModelStore,
        field: NodeId,
        controls: &[ControlPayload],
        inherited_field: Option<NodeId>,
    ) -> Result<()> {
        for payload in controls {
            let (control, counterpart) = link_inheriting_child(
                &self.ctx,
                store,
                field,
                ModelContainer::Controls,
                ModelType::Control,
                &payload.id,
                &payload.attributes,
                inherited_field,
            )?;
            ModelControlParamLinker::new(self.ctx).link(
                store,
                control,
                &payload.control_params,
                counterpart,
            )?;
        }
        inherit_children(store, field, ModelContainer::Controls, inherited_field)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ModelControlParamLinker<'m> {
    ctx: LinkContext<'m>,
}

impl<'m> ModelControlParamLinker<'m> {
    pub fn new(ctx: LinkContext<'m>) -> Self {
        Self { ctx }
    }

    pub fn link(
        &self,
        store: &mut ModelStore,
        control: NodeId,
        params: &[ControlParamPayload],
        inherited_control: Option<NodeId>,
    ) -> Result<()> {
        for payload in params {
            link_inheriting_child(
                &self.ctx,
                store,
                control,
                ModelContainer::ControlParams,
                ModelType::ControlParam,
                &payload.id,
                &payload.attributes,
                inherited_control,
            )?;
        }
        inherit_children(store, control, ModelContainer::ControlParams, inherited_control)?;
        Ok(())
    }
}
