pub mod error;
pub mod store;

pub use error::{Result, StoreError};
pub use store::{
    Campaign, CampaignPatch, ContentPost, NewCampaign, NewContentPost, PostPatch, SavedCampaign,
    Store,
};
