use crate::model::VarId;

/// Maps node ids to display names for rendering formulas and explanations.
pub trait NameResolver {
    /// Name of `id`, or a placeholder when the id is unknown.
    fn name_of(&self, id: VarId) -> String;
}
