//! Audio-intelligence results cached per session.
//!
//! Both variants live under the session's id in their own segment, so a new
//! computation of one variant replaces the previous one and never touches the
//! other.

use crate::entities::session::Session;
use crate::error::{Error, Result};
use crate::keyspace::{Entity, EntityKind, Keyspace, TtlClass};
use kanau::processor::Processor;
use pitchboard_sdk::objects::{
    BaselineAnalysisResponse, Chapter, EmotionScore, EnhancedAnalysisResponse, NamedEntity,
    PitchMetrics, SentimentSummary, SessionAnalysesResponse, StoreBaselineAnalysisRequest,
    StoreEnhancedAnalysisRequest,
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::{info, warn};

/// Broad, lower confidence analysis produced with the transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BaselineAnalysis {
    pub session_id: String,
    pub event_id: String,
    pub confidence: f64,
    pub sentiment: SentimentSummary,
    pub emotions: Vec<EmotionScore>,
    pub entities: Vec<NamedEntity>,
    pub chapters: Vec<Chapter>,
    pub summary: String,
    #[serde(with = "time::serde::rfc3339")]
    pub computed_at: OffsetDateTime,
}

impl Entity for BaselineAnalysis {
    const KIND: EntityKind = EntityKind::BaselineAnalysis;

    fn event_id(&self) -> &str {
        &self.event_id
    }

    fn ttl_class(&self) -> TtlClass {
        TtlClass::Analysis
    }
}

/// Outcome of the secondary pass. A failed pass is stored too, so callers can
/// tell "failed" apart from "not run yet".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnhancedAnalysis {
    pub session_id: String,
    pub event_id: String,
    pub success: bool,
    pub error: Option<String>,
    pub confidence: f64,
    pub sentiment: Option<SentimentSummary>,
    pub pitch_metrics: Option<PitchMetrics>,
    #[serde(with = "time::serde::rfc3339")]
    pub computed_at: OffsetDateTime,
}

impl EnhancedAnalysis {
    pub fn is_usable(&self) -> bool {
        self.success
    }
}

impl Entity for EnhancedAnalysis {
    const KIND: EntityKind = EntityKind::EnhancedAnalysis;

    fn event_id(&self) -> &str {
        &self.event_id
    }

    fn ttl_class(&self) -> TtlClass {
        TtlClass::Analysis
    }
}

/// Both analyses of one session as currently stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionAnalyses {
    pub baseline: Option<BaselineAnalysis>,
    pub enhanced: Option<EnhancedAnalysis>,
}

impl From<&BaselineAnalysis> for BaselineAnalysisResponse {
    fn from(a: &BaselineAnalysis) -> Self {
        BaselineAnalysisResponse {
            session_id: a.session_id.clone(),
            confidence: a.confidence,
            sentiment: a.sentiment.clone(),
            emotions: a.emotions.clone(),
            entities: a.entities.clone(),
            chapters: a.chapters.clone(),
            summary: a.summary.clone(),
            computed_at: a.computed_at,
        }
    }
}

impl From<&EnhancedAnalysis> for EnhancedAnalysisResponse {
    fn from(a: &EnhancedAnalysis) -> Self {
        EnhancedAnalysisResponse {
            session_id: a.session_id.clone(),
            success: a.success,
            error: a.error.clone(),
            confidence: a.confidence,
            sentiment: a.sentiment.clone(),
            pitch_metrics: a.pitch_metrics.clone(),
            computed_at: a.computed_at,
        }
    }
}

impl SessionAnalyses {
    pub fn to_response(&self, event_id: &str, session_id: &str) -> SessionAnalysesResponse {
        SessionAnalysesResponse {
            event_id: event_id.to_string(),
            session_id: session_id.to_string(),
            baseline: self.baseline.as_ref().map(Into::into),
            enhanced: self.enhanced.as_ref().map(Into::into),
        }
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

#[derive(Debug, Clone)]
pub struct StoreBaselineAnalysis {
    pub event_id: String,
    pub session_id: String,
    pub analysis: StoreBaselineAnalysisRequest,
}

impl Processor<StoreBaselineAnalysis> for Keyspace {
    type Output = BaselineAnalysis;
    type Error = Error;
    #[tracing::instrument(skip_all, err, name = "Keyspace:StoreBaselineAnalysis")]
    async fn process(&self, cmd: StoreBaselineAnalysis) -> Result<BaselineAnalysis> {
        let session: Session = self.get(&cmd.event_id, &cmd.session_id).await?;
        let req = cmd.analysis;
        let analysis = BaselineAnalysis {
            session_id: session.session_id,
            event_id: session.event_id,
            confidence: finite_or_zero(req.confidence),
            sentiment: req.sentiment,
            emotions: req.emotions,
            entities: req.entities,
            chapters: req.chapters,
            summary: req.summary,
            computed_at: OffsetDateTime::now_utc(),
        };
        self.put(&analysis.event_id, &analysis.session_id, &analysis)
            .await?;
        info!(
            event_id = %analysis.event_id,
            session_id = %analysis.session_id,
            confidence = analysis.confidence,
            "Stored baseline analysis"
        );
        Ok(analysis)
    }
}

#[derive(Debug, Clone)]
pub struct StoreEnhancedAnalysis {
    pub event_id: String,
    pub session_id: String,
    pub analysis: StoreEnhancedAnalysisRequest,
}

impl Processor<StoreEnhancedAnalysis> for Keyspace {
    type Output = EnhancedAnalysis;
    type Error = Error;
    #[tracing::instrument(skip_all, err, name = "Keyspace:StoreEnhancedAnalysis")]
    async fn process(&self, cmd: StoreEnhancedAnalysis) -> Result<EnhancedAnalysis> {
        let session: Session = self.get(&cmd.event_id, &cmd.session_id).await?;
        let req = cmd.analysis;
        let analysis = EnhancedAnalysis {
            session_id: session.session_id,
            event_id: session.event_id,
            success: req.success,
            error: req.error,
            confidence: finite_or_zero(req.confidence),
            sentiment: req.sentiment,
            pitch_metrics: req.pitch_metrics,
            computed_at: OffsetDateTime::now_utc(),
        };
        self.put(&analysis.event_id, &analysis.session_id, &analysis)
            .await?;
        if analysis.success {
            info!(
                event_id = %analysis.event_id,
                session_id = %analysis.session_id,
                confidence = analysis.confidence,
                "Stored enhanced analysis"
            );
        } else {
            warn!(
                event_id = %analysis.event_id,
                session_id = %analysis.session_id,
                error = analysis.error.as_deref().unwrap_or("unspecified"),
                "Enhanced analysis reported failure"
            );
        }
        Ok(analysis)
    }
}

#[derive(Debug, Clone)]
/// Read both analyses of a session. Fails only when the session is unknown.
pub struct GetAnalyses {
    pub event_id: String,
    pub session_id: String,
}

impl Processor<GetAnalyses> for Keyspace {
    type Output = SessionAnalyses;
    type Error = Error;
    async fn process(&self, query: GetAnalyses) -> Result<SessionAnalyses> {
        self.get::<Session>(&query.event_id, &query.session_id)
            .await?;
        self.load_analyses(&query.event_id, &query.session_id).await
    }
}

impl Keyspace {
    pub(crate) async fn load_analyses(
        &self,
        event_id: &str,
        session_id: &str,
    ) -> Result<SessionAnalyses> {
        Ok(SessionAnalyses {
            baseline: self.find::<BaselineAnalysis>(event_id, session_id).await?,
            enhanced: self.find::<EnhancedAnalysis>(event_id, session_id).await?,
        })
    }
}
