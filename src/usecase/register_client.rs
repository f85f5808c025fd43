//! UseCase: クライアント登録処理（clientConnected）
//!
//! ## 何をしているか
//!
//! クライアントが申告した識別子 `{id, email}` を、ローストの登録より先に
//! 永続化層と突き合わせて確定させる（resolve-or-create）。ストアの行が常に
//! 勝ち、申告 ID と食い違った場合は接続元だけに補正イベントを返せるよう
//! `IdentityCorrection` を結果に含める。
//!
//! ## なぜ永続化を先に引くのか
//!
//! ロースター登録を先にすると、補正後に古い ID のエントリが残り、同一
//! ユーザーが二重に現れる。確定 ID を得てから一度だけ登録すれば、
//! 「1 ユーザー = 最大 1 エントリ」の不変条件が崩れない。

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::common::time::Clock;
use crate::domain::{
    Email, RepositoryError, Roster, RosterEntry, SessionId, Timestamp, User, UserId,
    UserIdFactory, UserRepository,
};

use super::error::RegisterError;

/// 申告 ID がストアの ID と食い違ったときの補正内容
///
/// 接続元セッションにのみ通知される（他のセッションには流れない）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityCorrection {
    /// クライアントが申告していた ID
    pub old_id: UserId,
    /// ストアが確定した ID
    pub new_id: UserId,
    /// 対象ユーザーの email
    pub email: Email,
}

/// 登録結果
#[derive(Debug, Clone)]
pub struct Registration {
    /// 確定したユーザー
    pub user: User,
    /// ID 補正が起きた場合の内容
    pub correction: Option<IdentityCorrection>,
    /// 登録後のロースター全量（connectedClients ブロードキャスト用）
    pub roster: Vec<RosterEntry>,
}

/// クライアント登録のユースケース
pub struct RegisterClientUseCase {
    /// ユーザーストア（データアクセス層の抽象化）
    users: Arc<dyn UserRepository>,
    /// 在席ロースター（プロセス寿命の共有状態）
    roster: Arc<Mutex<Roster>>,
    /// 時刻取得の抽象化
    clock: Arc<dyn Clock>,
}

impl RegisterClientUseCase {
    /// 新しい RegisterClientUseCase を作成
    pub fn new(
        users: Arc<dyn UserRepository>,
        roster: Arc<Mutex<Roster>>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            roster,
            clock,
        }
    }

    /// クライアント登録を実行
    ///
    /// # Arguments
    ///
    /// * `session_id` - 接続のセッション ID（サーバー採番）
    /// * `claimed_id` - クライアント申告のユーザー ID（localStorage 由来）
    /// * `claimed_email` - クライアント申告の email
    ///
    /// # Returns
    ///
    /// * `Ok(Registration)` - 確定ユーザー・補正内容・ロースター全量
    /// * `Err(RegisterError)` - 申告値のバリデーション失敗
    pub async fn execute(
        &self,
        session_id: SessionId,
        claimed_id: String,
        claimed_email: String,
    ) -> Result<Registration, RegisterError> {
        let claimed_id = UserId::new(claimed_id)?;
        let email = Email::new(claimed_email)?;

        // 1. 永続化層と突き合わせて確定 ID を得る
        let (user, correction) = self.resolve_identity(claimed_id, email).await;

        // 2. 確定 ID でロースターに登録（同一ユーザーの旧エントリは上書き）
        let now = Timestamp::new(self.clock.now_millis());
        let roster = {
            let mut roster = self.roster.lock().await;
            roster.register(session_id, user.clone(), now);
            roster.snapshot()
        };

        Ok(Registration {
            user,
            correction,
            roster,
        })
    }

    /// resolve-or-create: email を鍵にストアの行を正として ID を確定する
    ///
    /// - email の行がある → その ID が勝ち（申告と違えば補正）
    /// - 行がない → 申告 ID でユーザー行を作る
    /// - 申告 ID が他の email に取られている → 新しい UUID を採番（補正）
    /// - ストア障害 → 警告を出して申告値のまま続行（このセッション限り）
    async fn resolve_identity(
        &self,
        claimed_id: UserId,
        email: Email,
    ) -> (User, Option<IdentityCorrection>) {
        match self.users.find_by_email(&email).await {
            Ok(existing) => {
                let correction = (existing.id != claimed_id).then(|| IdentityCorrection {
                    old_id: claimed_id,
                    new_id: existing.id.clone(),
                    email: existing.email.clone(),
                });
                (existing, correction)
            }
            Err(RepositoryError::UserNotFound(_)) => self.create_user(claimed_id, email).await,
            Err(e) => {
                tracing::warn!(
                    "User lookup failed, falling back to claimed identity: {}",
                    e
                );
                (User::new(claimed_id, email), None)
            }
        }
    }

    /// 申告 ID でユーザー行を作る。衝突したら email で再解決し、だめなら採番する
    async fn create_user(
        &self,
        claimed_id: UserId,
        email: Email,
    ) -> (User, Option<IdentityCorrection>) {
        let candidate = User::new(claimed_id.clone(), email.clone());
        match self.users.create(candidate.clone()).await {
            Ok(user) => (user, None),
            Err(RepositoryError::UserConflict(_)) => {
                // 並行登録で email の行が先にできたか、申告 ID が他人のもの。
                // email でもう一度引き、見つからなければ ID 衝突なので採番する。
                if let Ok(existing) = self.users.find_by_email(&email).await {
                    let correction = (existing.id != claimed_id).then(|| IdentityCorrection {
                        old_id: claimed_id,
                        new_id: existing.id.clone(),
                        email: existing.email.clone(),
                    });
                    return (existing, correction);
                }
                let minted = User::new(UserIdFactory::generate(), email.clone());
                let correction = IdentityCorrection {
                    old_id: claimed_id,
                    new_id: minted.id.clone(),
                    email,
                };
                match self.users.create(minted.clone()).await {
                    Ok(user) => (user, Some(correction)),
                    Err(e) => {
                        tracing::warn!("Minted user create failed, continuing unpersisted: {}", e);
                        (minted, Some(correction))
                    }
                }
            }
            Err(e) => {
                tracing::warn!(
                    "User create failed, falling back to claimed identity: {}",
                    e
                );
                (candidate, None)
            }
        }
    }
}
