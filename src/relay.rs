//! 起動リンクの保持と単一購読スロットへの転送を担うリレー本体。
//! ホスト側ライフサイクル呼び出しとWebview購読の橋渡しをここへ集約する。

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

/// クエリチャンネルが受け付ける操作名。ワイヤ名はフロント向けDTOと同じくcamelCase。
pub const INITIAL_LINK_OPERATION: &str = "getInitialLink";

/// 購読を識別するハンドル。リレーが採番し、購読側はこの値で解除を要求する。
pub type SubscriptionId = u32;

/// クエリチャンネルで観測しうる唯一のエラー種別。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayError {
    /// 未知の操作名を受け取った。
    UnsupportedOperation(String),
}

impl fmt::Display for RelayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelayError::UnsupportedOperation(operation) => {
                write!(f, "Unsupported link query operation: {operation}")
            }
        }
    }
}

impl std::error::Error for RelayError {}

/// 購読者への配信口。配信はベストエフォートで、失敗は呼び出し元へ伝播させない。
pub trait LinkSubscriber: Send + Sync {
    fn deliver(&self, link: &str);
}

struct Slot {
    id: SubscriptionId,
    subscriber: Arc<dyn LinkSubscriber>,
}

#[derive(Default)]
struct RelayState {
    initial_link: Option<String>,
    slot: Option<Slot>,
}

/// 起動リンクリレー。直近の起動リンクと高々1件の購読を保持する。
///
/// 変更系の操作はすべて単一のロック越しに行うが、ロックは項目の読み書きの間だけ
/// 保持し、購読者への転送呼び出しをまたいで握ることはない。
pub struct LinkRelay {
    state: Mutex<RelayState>,
    next_subscription: AtomicU32,
}

impl LinkRelay {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(RelayState::default()),
            next_subscription: AtomicU32::new(1),
        }
    }

    /// ホストがフォアグラウンド文脈へ接続した時点の起動リンクを取り込む。
    /// 再接続時は現在値で上書きする(Noneによる上書きを含む)。購読スロットには触れない。
    pub fn attach(&self, initial_link: Option<String>) {
        let Ok(mut state) = self.state.lock() else {
            return;
        };
        let captured = initial_link.is_some();
        state.initial_link = initial_link;
        log::debug!("Launch link relay attached (initial link captured: {captured})");
    }

    /// フォアグラウンド文脈からの切断。購読スロットだけを畳み、取り込み済みリンクは残す。
    pub fn detach(&self) {
        let Ok(mut state) = self.state.lock() else {
            return;
        };
        if state.slot.take().is_some() {
            log::debug!("Launch link subscription cleared on detach");
        }
    }

    /// 取り込み済みの起動リンクを返す。何度呼んでも同じ値で、副作用はない。
    pub fn initial_link(&self) -> Option<String> {
        match self.state.lock() {
            Ok(state) => state.initial_link.clone(),
            Err(_) => None,
        }
    }

    /// クエリチャンネルの入口。操作名で分岐し、未知の操作はエラーとして同期的に返す。
    pub fn query(&self, operation: &str) -> Result<Option<String>, RelayError> {
        match operation {
            INITIAL_LINK_OPERATION => Ok(self.initial_link()),
            other => Err(RelayError::UnsupportedOperation(other.to_string())),
        }
    }

    /// 購読者を登録し、採番したハンドルを返す。
    /// 既存の購読者は通知なしで置き換える。キューイングはせず、登録時点の同期配信もない。
    pub fn subscribe<S: LinkSubscriber + 'static>(&self, subscriber: S) -> SubscriptionId {
        let id = self.next_subscription.fetch_add(1, Ordering::SeqCst);
        let Ok(mut state) = self.state.lock() else {
            return id;
        };
        if let Some(displaced) = state.slot.replace(Slot {
            id,
            subscriber: Arc::new(subscriber),
        }) {
            log::debug!("Launch link subscription {} displaced by {id}", displaced.id);
        }
        id
    }

    /// 現在のスロットが`id`を保持している場合に限り購読を解除する。
    /// 置き換え済みの古いハンドルからの解除要求は何もしない。
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let Ok(mut state) = self.state.lock() else {
            return false;
        };
        match &state.slot {
            Some(slot) if slot.id == id => {
                state.slot = None;
                true
            }
            _ => false,
        }
    }

    /// リンクソースから届いた新規リンクを、現在の購読者へ1件のイベントとして転送する。
    /// 購読者が居なければそのまま捨てる(保持も再送もしない)。配信が起きたかを返す。
    pub fn publish(&self, link: &str) -> bool {
        // 転送先のArcだけをロック内で取り出し、配信はロック外で行う。
        // 購読者がコールバック中にリレーへ再入してもデッドロックさせない。
        let target = {
            let Ok(state) = self.state.lock() else {
                return false;
            };
            state.slot.as_ref().map(|slot| Arc::clone(&slot.subscriber))
        };

        match target {
            Some(subscriber) => {
                subscriber.deliver(link);
                true
            }
            None => {
                log::debug!("Launch link dropped: no active subscriber");
                false
            }
        }
    }
}

impl Default for LinkRelay {
    fn default() -> Self {
        Self::new()
    }
}
