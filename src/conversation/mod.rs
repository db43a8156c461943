use log::error;
use std::error::Error;
use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::config::prompt::{ get_routine_prompt, PromptConfig };
use crate::llm::chat::ChatClient;
use crate::models::catalog::Product;
use crate::models::chat::{ ChatMessage, Conversation, Role };
use crate::selection::format_selection_for_prompt;

/// Static, non-technical messages surfaced in the chat panel. Raw errors go
/// to the log only.
pub const ROUTINE_APOLOGY: &str =
    "Sorry, I couldn't generate a routine right now. Please try again.";
pub const FOLLOW_UP_APOLOGY: &str = "Sorry, I couldn't process your question. Please try again.";
pub const EMPTY_SELECTION_MESSAGE: &str =
    "Please select some products first to generate a routine.";
pub const REQUEST_PENDING_MESSAGE: &str =
    "A request is already in progress. Please wait for it to finish.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatState {
    Idle,
    AwaitingResponse,
    Displayed,
    Errored,
}

#[derive(Debug)]
pub enum ChatError {
    /// Precondition failure: generate-routine with nothing selected. Checked
    /// before any turn is appended or request issued.
    EmptySelection,
    /// A completion request is already in flight; the new submission is
    /// rejected without touching the history.
    RequestPending,
    /// Blank follow-up input, ignored without a turn.
    EmptyQuestion,
    /// The completion call failed. The user's turn stays in the history.
    Completion(String),
}

impl fmt::Display for ChatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatError::EmptySelection => write!(f, "No products selected"),
            ChatError::RequestPending => write!(f, "A completion request is already pending"),
            ChatError::EmptyQuestion => write!(f, "Question is empty"),
            ChatError::Completion(msg) => write!(f, "Completion request failed: {}", msg),
        }
    }
}

impl Error for ChatError {}

struct ConversationInner {
    conversation: Conversation,
    state: ChatState,
}

/// Accumulates the linear turn history and issues completion requests.
/// One in-flight request slot: submissions made while a request is pending
/// are rejected rather than raced.
pub struct ConversationController {
    chat_client: Arc<dyn ChatClient>,
    prompt_config: Arc<PromptConfig>,
    inner: Mutex<ConversationInner>,
    history_turns: usize,
}

impl ConversationController {
    pub fn new(
        chat_client: Arc<dyn ChatClient>,
        prompt_config: Arc<PromptConfig>,
        history_turns: usize,
    ) -> Self {
        Self {
            chat_client,
            prompt_config,
            inner: Mutex::new(ConversationInner {
                conversation: Conversation::new(),
                state: ChatState::Idle,
            }),
            history_turns,
        }
    }

    pub async fn state(&self) -> ChatState {
        self.inner.lock().await.state
    }

    pub async fn history(&self) -> Vec<ChatMessage> {
        self.inner.lock().await.conversation.messages.clone()
    }

    /// Builds the routine prompt from the selection and submits it. Fails
    /// fast on an empty selection: no turn appended, no network call.
    pub async fn generate_routine(&self, selection: &[Product]) -> Result<String, ChatError> {
        if selection.is_empty() {
            return Err(ChatError::EmptySelection);
        }

        let products_json = format_selection_for_prompt(selection);
        let prompt = get_routine_prompt(&self.prompt_config, &products_json).map_err(|e|
            ChatError::Completion(e.to_string())
        )?;

        self.submit(&prompt).await
    }

    /// Submits a follow-up question on the accumulated history.
    pub async fn ask(&self, question: &str) -> Result<String, ChatError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(ChatError::EmptyQuestion);
        }

        self.submit(question).await
    }

    async fn submit(&self, content: &str) -> Result<String, ChatError> {
        let (conversation_id, window) = {
            let mut inner = self.inner.lock().await;
            if inner.state == ChatState::AwaitingResponse {
                return Err(ChatError::RequestPending);
            }
            inner.conversation.messages.push(ChatMessage::new(Role::User, content));
            inner.state = ChatState::AwaitingResponse;
            (
                inner.conversation.id.clone(),
                request_window(&inner.conversation.messages, self.history_turns),
            )
        };

        let result = self.chat_client.complete(&window).await;

        let mut inner = self.inner.lock().await;
        match result {
            Ok(reply) => {
                inner.conversation.messages.push(ChatMessage::new(Role::Assistant, &reply.content));
                inner.state = ChatState::Displayed;
                Ok(reply.content)
            }
            Err(e) => {
                // The user's turn stays; the caller renders a static apology.
                error!("Completion request failed for conversation {}: {}", conversation_id, e);
                inner.state = ChatState::Errored;
                Err(ChatError::Completion(e.to_string()))
            }
        }
    }
}

/// Bounded request payload: when the history exceeds `cap` turns, the first
/// user turn (it carries the product context) plus the most recent turns are
/// sent. 0 means no cap.
pub fn request_window(messages: &[ChatMessage], cap: usize) -> Vec<ChatMessage> {
    if cap == 0 || messages.len() <= cap {
        return messages.to_vec();
    }

    let mut window = vec![messages[0].clone()];
    let tail = cap - 1;
    window.extend(messages[messages.len() - tail..].iter().cloned());
    window
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::chat::{ ChatClient, CompletionResponse };
    use async_trait::async_trait;
    use std::error::Error as StdError;
    use std::sync::atomic::{ AtomicUsize, Ordering };
    use tokio::sync::Notify;

    enum MockMode {
        Reply(String),
        Fail,
        /// Waits for the notify before replying, to hold the request slot open.
        Block(Arc<Notify>),
    }

    struct MockChatClient {
        mode: MockMode,
        calls: AtomicUsize,
    }

    impl MockChatClient {
        fn replying(content: &str) -> Arc<Self> {
            Arc::new(Self {
                mode: MockMode::Reply(content.to_string()),
                calls: AtomicUsize::new(0),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                mode: MockMode::Fail,
                calls: AtomicUsize::new(0),
            })
        }

        fn blocking(gate: Arc<Notify>) -> Arc<Self> {
            Arc::new(Self {
                mode: MockMode::Block(gate),
                calls: AtomicUsize::new(0),
            })
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ChatClient for MockChatClient {
        async fn complete(
            &self,
            _messages: &[ChatMessage]
        ) -> Result<CompletionResponse, Box<dyn StdError + Send + Sync>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.mode {
                MockMode::Reply(content) =>
                    Ok(CompletionResponse { content: content.clone() }),
                MockMode::Fail => Err("completion backend unavailable".into()),
                MockMode::Block(gate) => {
                    gate.notified().await;
                    Ok(CompletionResponse { content: "late reply".to_string() })
                }
            }
        }
    }

    fn product(name: &str) -> Product {
        Product {
            name: name.to_string(),
            category: "Serum".to_string(),
            image: String::new(),
            description: None,
            benefits: None,
            ingredients: None,
        }
    }

    fn controller(client: Arc<MockChatClient>) -> ConversationController {
        ConversationController::new(client, Arc::new(PromptConfig::default()), 20)
    }

    #[tokio::test]
    async fn empty_selection_never_issues_a_request() {
        let client = MockChatClient::replying("routine");
        let controller = controller(client.clone());

        let result = controller.generate_routine(&[]).await;
        assert!(matches!(result, Err(ChatError::EmptySelection)));
        assert_eq!(client.call_count(), 0);
        assert!(controller.history().await.is_empty());
        assert_eq!(controller.state().await, ChatState::Idle);
    }

    #[tokio::test]
    async fn successful_routine_appends_both_turns() {
        let client = MockChatClient::replying("# Morning routine");
        let controller = controller(client.clone());

        let reply = controller.generate_routine(&[product("Serum B")]).await.unwrap();
        assert_eq!(reply, "# Morning routine");
        assert_eq!(controller.state().await, ChatState::Displayed);

        let history = controller.history().await;
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].role, Role::User);
        assert!(history[0].content.contains("Serum B"));
        assert_eq!(history[1].role, Role::Assistant);
    }

    #[tokio::test]
    async fn failed_request_keeps_the_user_turn() {
        let client = MockChatClient::failing();
        let controller = controller(client.clone());

        let result = controller.generate_routine(&[product("Serum B")]).await;
        assert!(matches!(result, Err(ChatError::Completion(_))));
        assert_eq!(controller.state().await, ChatState::Errored);

        let history = controller.history().await;
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].role, Role::User);
    }

    #[tokio::test]
    async fn blank_questions_are_ignored() {
        let client = MockChatClient::replying("answer");
        let controller = controller(client.clone());

        assert!(matches!(controller.ask("   ").await, Err(ChatError::EmptyQuestion)));
        assert_eq!(client.call_count(), 0);
    }

    #[tokio::test]
    async fn second_submission_is_rejected_while_pending() {
        let gate = Arc::new(Notify::new());
        let client = MockChatClient::blocking(gate.clone());
        let controller = Arc::new(controller(client.clone()));

        let first = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.ask("first question").await })
        };

        // Let the first request take the slot before submitting the second.
        while controller.state().await != ChatState::AwaitingResponse {
            tokio::task::yield_now().await;
        }

        let second = controller.ask("second question").await;
        assert!(matches!(second, Err(ChatError::RequestPending)));

        gate.notify_one();
        let first = first.await.unwrap().unwrap();
        assert_eq!(first, "late reply");
        assert_eq!(client.call_count(), 1);

        // Only the first submission reached the history.
        let history = controller.history().await;
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].content, "first question");
    }

    #[tokio::test]
    async fn errored_turn_is_terminal_but_not_fatal() {
        let client = MockChatClient::failing();
        let controller = controller(client.clone());

        let _ = controller.ask("question").await;
        assert_eq!(controller.state().await, ChatState::Errored);

        // The user re-invokes manually; the controller accepts new input.
        let _ = controller.ask("again").await;
        assert_eq!(client.call_count(), 2);
    }

    #[test]
    fn window_below_cap_sends_full_history() {
        let messages = vec![
            ChatMessage::new(Role::User, "a"),
            ChatMessage::new(Role::Assistant, "b")
        ];
        assert_eq!(request_window(&messages, 5).len(), 2);
    }

    #[test]
    fn window_above_cap_keeps_first_turn_and_recent_tail() {
        let messages: Vec<ChatMessage> = (0..10)
            .map(|i| ChatMessage::new(Role::User, &i.to_string()))
            .collect();

        let window = request_window(&messages, 4);
        assert_eq!(window.len(), 4);
        assert_eq!(window[0].content, "0");
        assert_eq!(window[1].content, "7");
        assert_eq!(window[3].content, "9");
    }

    #[test]
    fn zero_cap_means_unbounded() {
        let messages: Vec<ChatMessage> = (0..10)
            .map(|i| ChatMessage::new(Role::User, &i.to_string()))
            .collect();
        assert_eq!(request_window(&messages, 0).len(), 10);
    }
}
