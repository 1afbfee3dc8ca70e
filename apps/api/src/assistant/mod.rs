// Conversational core: intent classification and score/category extraction.
// Pure and synchronous. Nothing here touches the network or the AI adapters.

pub mod classifier;
pub mod extractor;
pub mod replies;
