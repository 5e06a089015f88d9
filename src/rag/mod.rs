//! Retrieval-augmented feedback
//!
//! Explanation sentences, the knowledge base, topic retrieval and the
//! question-aware guidance chatbot.

pub mod chatbot;
pub mod explanation;
pub mod knowledge;
pub mod retriever;

pub use chatbot::{rag_chatbot, ChatContext, GuidanceAssistant};
pub use explanation::generate_explanation;
pub use knowledge::{KnowledgeBase, KnowledgeEntry};
pub use retriever::{retrieve_context, RetrievalQuery};
