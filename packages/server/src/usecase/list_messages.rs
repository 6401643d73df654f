//! UseCase: メッセージ履歴の取得（REST API 用）
//!
//! 新しい順（most-recent-first）の 1 ページを返します。

use std::sync::Arc;

use crate::domain::{ChatId, Message, MessageStore};

use super::error::DeliveryError;

pub const DEFAULT_PAGE_SIZE: u32 = 50;
pub const MAX_PAGE_SIZE: u32 = 200;

pub struct ListMessagesUseCase {
    message_store: Arc<dyn MessageStore>,
}

impl ListMessagesUseCase {
    pub fn new(message_store: Arc<dyn MessageStore>) -> Self {
        Self { message_store }
    }

    /// `page` は 1 始まり。未指定なら 1 ページ目、`limit` は 1..=MAX_PAGE_SIZE に丸める
    pub async fn execute(
        &self,
        chat_id: &ChatId,
        page: Option<u32>,
        limit: Option<u32>,
    ) -> Result<Vec<Message>, DeliveryError> {
        let page = page.unwrap_or(1).max(1);
        let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);

        self.message_store
            .list_page(chat_id, page, limit)
            .await
            .map_err(|e| DeliveryError::persistence("load messages", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{domain::MockMessageStore, usecase::test_support::chat};

    #[tokio::test]
    async fn test_defaults_to_first_page_of_fifty() {
        // テスト項目: page / limit 未指定時は 1 ページ目・50 件で取得する
        // given (前提条件):
        let mut store = MockMessageStore::new();
        store
            .expect_list_page()
            .withf(|_, page, size| *page == 1 && *size == DEFAULT_PAGE_SIZE)
            .times(1)
            .returning(|_, _, _| Ok(Vec::new()));
        let usecase = ListMessagesUseCase::new(Arc::new(store));

        // when (操作):
        let result = usecase.execute(&chat("chat1"), None, None).await;

        // then (期待する結果):
        assert_eq!(result, Ok(Vec::new()));
    }

    #[tokio::test]
    async fn test_out_of_range_arguments_are_clamped() {
        // テスト項目: page=0 は 1 に、過大な limit は上限に丸められる
        // given (前提条件):
        let mut store = MockMessageStore::new();
        store
            .expect_list_page()
            .withf(|_, page, size| *page == 1 && *size == MAX_PAGE_SIZE)
            .times(1)
            .returning(|_, _, _| Ok(Vec::new()));
        let usecase = ListMessagesUseCase::new(Arc::new(store));

        // when (操作):
        let result = usecase.execute(&chat("chat1"), Some(0), Some(10_000)).await;

        // then (期待する結果):
        assert!(result.is_ok());
    }
}
