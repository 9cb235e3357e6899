use std::sync::Arc;

use crate::flow::GiftFlow;

#[derive(Clone)]
pub struct BotDependencies {
    pub flow: Arc<GiftFlow>,
}
