//! Overlap resolution across motif families.
//!
//! Candidates move `Proposed → Accepted | Trimmed | Rejected`. They are
//! visited largest first (consumed-vertex count, then total vertex count,
//! then discovery order) and accepted only when none of their consumed
//! vertices is already claimed. Anchors and fan heads are never claimed.

use roaring::RoaringBitmap;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use tracing::{debug, trace};

use crate::motif::{Motif, MotifKind};
use crate::progress::{Cancelled, Checkpoint};

/// Why a candidate was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    /// A consumed vertex already belongs to an accepted motif.
    VertexClaimed,
    /// A D-connector would swap anchor and span roles with an accepted one.
    RoleConflict,
    /// Trimming left the clique below the minimum size.
    TrimmedTooSmall,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateState {
    Proposed,
    Accepted,
    /// Accepted after dropping `removed` already-claimed clique members.
    Trimmed { removed: usize },
    Rejected(RejectionReason),
}

impl CandidateState {
    pub fn is_accepted(&self) -> bool {
        matches!(self, CandidateState::Accepted | CandidateState::Trimmed { .. })
    }
}

#[derive(Debug, Clone)]
struct Candidate {
    motif: Motif,
    discovery: usize,
    state: CandidateState,
}

/// Per-family candidate bookkeeping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyStats {
    pub proposed: usize,
    pub accepted: usize,
    pub trimmed: usize,
    pub rejected: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionStats {
    pub fan: FamilyStats,
    pub d_connector: FamilyStats,
    pub clique: FamilyStats,
}

impl ResolutionStats {
    pub fn family(&self, kind: MotifKind) -> &FamilyStats {
        match kind {
            MotifKind::Fan => &self.fan,
            MotifKind::DConnector => &self.d_connector,
            MotifKind::Clique => &self.clique,
        }
    }

    fn family_mut(&mut self, kind: MotifKind) -> &mut FamilyStats {
        match kind {
            MotifKind::Fan => &mut self.fan,
            MotifKind::DConnector => &mut self.d_connector,
            MotifKind::Clique => &mut self.clique,
        }
    }

    pub fn total_accepted(&self) -> usize {
        MotifKind::ALL
            .iter()
            .map(|&k| self.family(k).accepted + self.family(k).trimmed)
            .sum()
    }

    pub fn total_rejected(&self) -> usize {
        MotifKind::ALL.iter().map(|&k| self.family(k).rejected).sum()
    }
}

/// Accepted motifs (in discovery order) plus bookkeeping.
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    pub accepted: Vec<Motif>,
    pub stats: ResolutionStats,
}

// ============================================================================
// Resolver
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct OverlapResolver {
    candidates: Vec<Candidate>,
    claimed: RoaringBitmap,
    accepted_anchors: RoaringBitmap,
    accepted_spans: RoaringBitmap,
    /// Minimum clique size for trimming; `None` disables trimming.
    trim_cliques_to: Option<usize>,
}

impl OverlapResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept overlapping cliques with their unclaimed members when at least
    /// `min_members` remain.
    pub fn with_clique_trimming(mut self, min_members: usize) -> Self {
        self.trim_cliques_to = Some(min_members);
        self
    }

    /// Queue a candidate; call order is discovery order.
    pub fn propose(&mut self, motif: impl Into<Motif>) {
        let discovery = self.candidates.len();
        self.candidates.push(Candidate {
            motif: motif.into(),
            discovery,
            state: CandidateState::Proposed,
        });
    }

    pub fn extend<I, M>(&mut self, motifs: I)
    where
        I: IntoIterator<Item = M>,
        M: Into<Motif>,
    {
        for motif in motifs {
            self.propose(motif);
        }
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Vertices claimed so far.
    pub fn claimed(&self) -> &RoaringBitmap {
        &self.claimed
    }

    pub fn resolve(mut self, checkpoint: &Checkpoint<'_>) -> Result<Resolution, Cancelled> {
        let mut order: Vec<usize> = (0..self.candidates.len()).collect();
        order.sort_by_key(|&i| {
            let motif = &self.candidates[i].motif;
            (
                Reverse(motif.vertices_in_motif().len()),
                Reverse(motif.role_vertices().len() + motif.vertices_in_motif().len()),
                self.candidates[i].discovery,
            )
        });

        let total = order.len();
        let mut stats = ResolutionStats::default();
        for (step, &i) in order.iter().enumerate() {
            checkpoint.tick(step, total)?;
            let state = self.decide(i);
            let kind = self.candidates[i].motif.kind();
            let family = stats.family_mut(kind);
            family.proposed += 1;
            match &state {
                CandidateState::Accepted => family.accepted += 1,
                CandidateState::Trimmed { .. } => family.trimmed += 1,
                CandidateState::Rejected(reason) => {
                    family.rejected += 1;
                    trace!(
                        %kind,
                        ?reason,
                        vertices = ?self.candidates[i].motif.vertices_in_motif(),
                        "candidate rejected"
                    );
                }
                CandidateState::Proposed => {}
            }
            self.candidates[i].state = state;
        }
        checkpoint.finish(total);

        let accepted: Vec<Motif> = self
            .candidates
            .into_iter()
            .filter(|c| c.state.is_accepted())
            .map(|c| c.motif)
            .collect();
        debug!(
            proposed = total,
            accepted = accepted.len(),
            "overlap resolution finished"
        );
        Ok(Resolution { accepted, stats })
    }

    fn decide(&mut self, i: usize) -> CandidateState {
        if let Motif::DConnector(d) = &self.candidates[i].motif {
            let swaps_roles = d
                .spans()
                .iter()
                .any(|s| self.accepted_anchors.contains(s.raw()))
                || d
                    .anchors()
                    .iter()
                    .any(|a| self.accepted_spans.contains(a.raw()));
            if swaps_roles {
                return CandidateState::Rejected(RejectionReason::RoleConflict);
            }
        }

        let consumed = self.candidates[i].motif.consumed_bitmap();
        if consumed.is_disjoint(&self.claimed) {
            self.claim(i, &consumed);
            return CandidateState::Accepted;
        }

        let (Some(min_members), Motif::Clique(clique)) =
            (self.trim_cliques_to, &mut self.candidates[i].motif)
        else {
            return CandidateState::Rejected(RejectionReason::VertexClaimed);
        };
        let removed = consumed.intersection_len(&self.claimed) as usize;
        if clique.members().len() - removed < min_members {
            return CandidateState::Rejected(RejectionReason::TrimmedTooSmall);
        }
        clique.remove_claimed(&self.claimed);
        let remaining = self.candidates[i].motif.consumed_bitmap();
        self.claim(i, &remaining);
        CandidateState::Trimmed { removed }
    }

    fn claim(&mut self, i: usize, consumed: &RoaringBitmap) {
        self.claimed |= consumed;
        if let Motif::DConnector(d) = &self.candidates[i].motif {
            self.accepted_anchors
                .extend(d.anchors().iter().map(|a| a.raw()));
            self.accepted_spans.extend(d.spans().iter().map(|s| s.raw()));
        }
    }
}
