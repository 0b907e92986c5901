//! # adintel
//!
//! > **Marketing-analytics dashboard backend.**
//!
//! Ingests advertising-campaign rows into SQLite, derives ROI / CTR / conversion
//! rate / campaign score / CPC / ROAS on read, serves the dashboard's JSON
//! routes and wraps a pre-trained multi-output model behind `POST /predict`.
//!
//! ## Architecture
//!
//! ```text
//! axum route ──► DashboardService ──► CampaignClient ──► ResourceActor<Campaign> ──► campaigns
//!            └─► PredictionService ─► CampaignClient + Predictor
//!            └─► InsightClient ─────────────────────► ResourceActor<Insight>  ──► predictive_insights
//! ```
//!
//! Each table is owned by one actor task holding its own SQLite connection.
//! Handlers never see SQL; they call typed clients, and the actor answers
//! CRUD requests, row actions (`ApplyTraffic`) and collection queries
//! (`Totals`, `PerCampaign`, `DailyTotals`, ...).
//!
//! ## Module Tour
//!
//! ### 1. The Engine ([`framework`])
//! The generic `ResourceActor<T, S>` message loop, the [`ResourceStore`](framework::ResourceStore)
//! seam it persists through, and a [`MockClient`](framework::mock::MockClient) for tests.
//!
//! ### 2. The Tables ([`campaign_actor`], [`insight_actor`])
//! [`ActorEntity`](framework::ActorEntity) implementations and their SQLite stores.
//!
//! ### 3. The Interface ([`clients`])
//! Typed wrappers around `ResourceClient`, one per table.
//!
//! ### 4. The Read Models ([`metrics`], [`dashboard`], [`predictor`])
//! Formulas, dashboard views, weekly back-fill, live traffic and the prediction pipeline.
//!
//! ### 5. The Edges ([`http`], [`ingest`], [`config`], [`runtime`])
//! Routes, CSV bulk loading, CLI settings and actor start-up / shutdown.
//!
//! ## Running
//!
//! ```bash
//! adintel init-db
//! adintel load-csv data/campaigns.csv
//! adintel seed-insights
//! RUST_LOG=info adintel serve --listen-addr 127.0.0.1:5000
//! ```

pub mod campaign_actor;
pub mod clients;
pub mod config;
pub mod dashboard;
pub mod db;
pub mod framework;
pub mod http;
pub mod ingest;
pub mod insight_actor;
pub mod metrics;
pub mod model;
pub mod predictor;
pub mod runtime;
