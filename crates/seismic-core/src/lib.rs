// ─────────────────────────────────────────────────────────────────────
// SCPN Seismic Core — Core Pipeline
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Shear-wave simulation pipeline: material profile, source forcing,
//! operator assembly, reduced-order projection, and the sampling
//! drivers that amortize one-time costs across many runs.

pub mod basis;
pub mod fom;
pub mod forcing;
pub mod integrate;
pub mod material;
pub mod observer;
pub mod operators;
pub mod problem;
pub mod rom;
pub mod signal;
pub mod stability;
