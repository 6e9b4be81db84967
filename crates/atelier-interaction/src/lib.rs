//! Remote adapters: the chat-completion client and the hosted image
//! generator. Both speak the OpenAI-compatible REST dialect.

pub mod chat_completion_client;
pub mod image_generation_client;

pub use chat_completion_client::ChatCompletionClient;
pub use image_generation_client::HostedImageProvider;
