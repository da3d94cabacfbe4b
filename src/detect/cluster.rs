//! Greedy nearest-neighbor clustering of sampled candidates.
//!
//! Each candidate joins the first existing cluster (insertion order) whose
//! anchor is strictly closer than `MIN_SEPARATION`. A joining candidate only
//! takes over the cluster's anchor and confidence when it is strictly more
//! confident, so on ties the first-seen point wins. Otherwise a new cluster
//! is appended.
//!
//! Cost is O(candidates x clusters) per frame. There is no spatial index; this
//! stays cheap only because thresholding leaves few clusters.

use crate::detect::result::{Detection, DetectionKind, Location, DETECTION_SIZE};
use crate::detect::sampler::Candidate;

/// Minimum distance between two reported detections, in pixels.
pub const MIN_SEPARATION: f32 = DETECTION_SIZE as f32;

pub struct Clusterer {
    kind: DetectionKind,
    detections: Vec<Detection>,
}

impl Clusterer {
    pub fn new(kind: DetectionKind) -> Self {
        Self {
            kind,
            detections: Vec::new(),
        }
    }

    pub fn push(&mut self, candidate: Candidate) {
        let near = self
            .detections
            .iter()
            .position(|d| d.location.distance_to(candidate.x, candidate.y) < MIN_SEPARATION);

        match near {
            Some(idx) => {
                if candidate.confidence > self.detections[idx].confidence {
                    self.detections[idx].location = Location::at(candidate.x, candidate.y);
                    self.detections[idx].confidence = candidate.confidence;
                    self.settle(idx);
                }
            }
            None => self.detections.push(Detection {
                kind: self.kind,
                location: Location::at(candidate.x, candidate.y),
                confidence: candidate.confidence,
            }),
        }
    }

    /// A replaced anchor may have moved into range of another cluster.
    /// Merge pairs until the moved cluster is clear of every other one; the
    /// survivor keeps the earlier slot and the more confident anchor.
    fn settle(&mut self, mut idx: usize) {
        loop {
            let anchor = self.detections[idx].location;
            let Some(other) = self
                .detections
                .iter()
                .enumerate()
                .position(|(i, d)| i != idx && d.location.is_near(&anchor, MIN_SEPARATION))
            else {
                return;
            };

            let (first, second) = (idx.min(other), idx.max(other));
            if self.detections[second].confidence > self.detections[first].confidence {
                self.detections[first].location = self.detections[second].location;
                self.detections[first].confidence = self.detections[second].confidence;
            }
            self.detections.remove(second);
            idx = first;
        }
    }

    pub fn len(&self) -> usize {
        self.detections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detections.is_empty()
    }

    pub fn into_detections(self) -> Vec<Detection> {
        self.detections
    }
}

/// Cluster a row-major candidate stream into detections of one kind.
pub fn cluster<I>(candidates: I, kind: DetectionKind) -> Vec<Detection>
where
    I: IntoIterator<Item = Candidate>,
{
    let mut clusterer = Clusterer::new(kind);
    for candidate in candidates {
        clusterer.push(candidate);
    }
    clusterer.into_detections()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(x: u32, y: u32, confidence: f32) -> Candidate {
        Candidate { x, y, confidence }
    }

    #[test]
    fn nearby_candidates_merge_into_one() {
        let detections = cluster(
            vec![c(0, 0, 0.5), c(4, 0, 0.5), c(0, 4, 0.5)],
            DetectionKind::Camera,
        );
        assert_eq!(detections.len(), 1);
        assert_eq!(detections[0].location, Location::at(0, 0));
    }

    #[test]
    fn stronger_candidate_takes_over_anchor() {
        let detections = cluster(vec![c(0, 0, 0.2), c(8, 4, 0.9)], DetectionKind::Ir);
        assert_eq!(detections.len(), 1);
        assert_eq!(detections[0].location, Location::at(8, 4));
        assert_eq!(detections[0].confidence, 0.9);
        assert_eq!(detections[0].kind, DetectionKind::Ir);
    }

    #[test]
    fn equal_confidence_keeps_first_seen() {
        let detections = cluster(vec![c(0, 0, 0.7), c(4, 4, 0.7)], DetectionKind::Camera);
        assert_eq!(detections.len(), 1);
        assert_eq!(detections[0].location, Location::at(0, 0));
    }

    #[test]
    fn distant_candidates_stay_separate() {
        let detections = cluster(vec![c(0, 0, 0.3), c(20, 0, 0.6)], DetectionKind::Camera);
        assert_eq!(detections.len(), 2);
        assert_eq!(detections[1].location, Location::at(20, 0));
    }

    #[test]
    fn moved_anchor_absorbs_clusters_it_now_overlaps() {
        // (0,0) and (24,0) start apart; a stronger point at (12,0) joins the
        // first cluster and lands 12 px from the second.
        let detections = cluster(
            vec![c(0, 0, 0.4), c(24, 0, 0.6), c(12, 0, 0.5)],
            DetectionKind::Camera,
        );
        assert_eq!(detections.len(), 1);
        assert_eq!(detections[0].location, Location::at(24, 0));
        assert_eq!(detections[0].confidence, 0.6);
    }

    #[test]
    fn reported_anchors_respect_min_separation() {
        let mut candidates = Vec::new();
        for y in (0..64).step_by(4) {
            for x in (0..64).step_by(4) {
                let confidence = ((x * 7 + y * 13) % 17) as f32 / 17.0 + 0.01;
                candidates.push(c(x, y, confidence));
            }
        }
        let detections = cluster(candidates, DetectionKind::Camera);
        for (i, a) in detections.iter().enumerate() {
            for b in &detections[i + 1..] {
                assert!(!a.location.is_near(&b.location, MIN_SEPARATION));
            }
        }
    }
}
