//! UseCase: クライアント切断処理

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::common::time::Clock;
use crate::domain::{Roster, RosterEntry, SessionId, Timestamp};

/// クライアント切断のユースケース
///
/// ロースターのエントリは消さず `connected = false` にするだけ。
/// 「誰がいたか」はプロセスが生きている限り残る。
pub struct DisconnectClientUseCase {
    /// 在席ロースター（プロセス寿命の共有状態)
    roster: Arc<Mutex<Roster>>,
    /// 時刻取得の抽象化
    clock: Arc<dyn Clock>,
}

impl DisconnectClientUseCase {
    /// 新しい DisconnectClientUseCase を作成
    pub fn new(roster: Arc<Mutex<Roster>>, clock: Arc<dyn Clock>) -> Self {
        Self { roster, clock }
    }

    /// クライアント切断を実行
    ///
    /// # Returns
    ///
    /// * `Some(Vec<RosterEntry>)` - 状態が変わった場合の更新後ロースター全量
    /// * `None` - 未知のセッション、または新しい登録に置き換えられた古い
    ///   セッションの遅延切断（no-op、ブロードキャスト不要）
    pub async fn execute(&self, session_id: &SessionId) -> Option<Vec<RosterEntry>> {
        let now = Timestamp::new(self.clock.now_millis());
        let mut roster = self.roster.lock().await;
        if roster.disconnect(session_id, now) {
            Some(roster.snapshot())
        } else {
            None
        }
    }
}
