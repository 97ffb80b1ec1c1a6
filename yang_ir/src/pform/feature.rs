use crate::{StringId, Status};

#[derive(Clone, Debug)]
pub struct FeatureP {
    pub name: StringId,
    pub iffeatures: Vec<StringId>,
    pub status: Option<Status>,
    pub description: Option<StringId>,
}
