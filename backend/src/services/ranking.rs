//! Streamer ranking by follower count.

use std::sync::Arc;

use log::warn;
use serde::{Deserialize, Serialize};

use super::context::RequestContext;
use super::error::ProgrammeResult;
use crate::db::repo_config::DEFAULT_GLOBAL_LIMIT;
use crate::db::repository::{FollowRepository, FullRepository, StreamerRepository};
use crate::models::Streamer;

/// A streamer together with its follower count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedStreamer {
    pub streamer: Streamer,
    pub follower_count: u64,
}

#[derive(Clone)]
pub struct FollowerRanker {
    repo: Arc<dyn FullRepository>,
    default_limit: usize,
}

impl FollowerRanker {
    pub fn new(repo: Arc<dyn FullRepository>) -> Self {
        Self {
            repo,
            default_limit: DEFAULT_GLOBAL_LIMIT,
        }
    }

    /// Limit used when a caller passes `0`.
    pub fn with_default_limit(mut self, limit: usize) -> Self {
        if limit > 0 {
            self.default_limit = limit;
        }
        self
    }

    pub fn effective_limit(&self, limit: usize) -> usize {
        if limit == 0 {
            self.default_limit
        } else {
            limit
        }
    }

    /// All streamers ordered by follower count, highest first, truncated to `limit`.
    ///
    /// A failed count for one streamer ranks it with zero followers. Equal
    /// counts keep the store's enumeration order.
    pub async fn ranked_streamers(
        &self,
        ctx: &RequestContext,
        limit: usize,
    ) -> ProgrammeResult<Vec<RankedStreamer>> {
        let limit = self.effective_limit(limit);
        let streamers = ctx
            .run("list_streamers", self.repo.list_streamers(None))
            .await?;

        let mut ranked = Vec::with_capacity(streamers.len());
        for streamer in streamers {
            let follower_count = match ctx
                .run("follower_count", self.repo.follower_count(&streamer.id))
                .await
            {
                Ok(count) => count,
                Err(e) if e.is_cancellation() || ctx.is_cancelled() => {
                    return Err(ctx.interrupted("follower_count", e))
                }
                Err(e) => {
                    warn!("Follower count for {} unavailable: {}", streamer.id, e);
                    0
                }
            };
            ranked.push(RankedStreamer {
                streamer,
                follower_count,
            });
        }

        ranked.sort_by(|a, b| b.follower_count.cmp(&a.follower_count));
        ranked.truncate(limit);
        Ok(ranked)
    }
}
