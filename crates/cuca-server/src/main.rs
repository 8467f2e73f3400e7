// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Cuca booking server binary.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use cuca_server::{
	commands::{self, CreateReservationArgs},
	create_app_state, create_router, db, ServerConfig,
};
use tower_http::{
	cors::{Any, CorsLayer},
	trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Cuca server - accounts, sessions and reservations over HTTP.
#[derive(Parser, Debug)]
#[command(name = "cuca-server", about = "Cuca booking server", version)]
struct Args {
	/// Config file to use instead of /etc/cuca/server.toml
	#[arg(long, global = true, env = "CUCA_SERVER_CONFIG")]
	config: Option<PathBuf>,

	#[command(subcommand)]
	command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Run the HTTP server (default)
	Serve,
	/// Show version information
	Version,
	/// Write a reservation directly to the store
	CreateReservation {
		#[arg(long)]
		email: String,
		#[arg(long)]
		name: String,
		#[arg(long)]
		phone: String,
		/// Comma-separated RFC 3339 timestamps, one per night
		#[arg(long, value_delimiter = ',', required = true)]
		dates: Vec<DateTime<Utc>>,
		#[arg(long, default_value_t = 1)]
		hosts: u32,
		#[arg(long)]
		pets: bool,
	},
	/// Grant (or with --revoke, remove) the admin flag on an account
	GrantAdmin {
		#[arg(long)]
		email: String,
		#[arg(long)]
		revoke: bool,
	},
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	if let Some(Command::Version) = args.command {
		println!("cuca-server version: {}", env!("CARGO_PKG_VERSION"));
		return Ok(());
	}

	// Load .env file if present
	dotenvy::dotenv().ok();

	let config = match &args.config {
		Some(path) => cuca_server_config::load_config_with_file(path)?,
		None => cuca_server_config::load_config()?,
	};

	tracing_subscriber::registry()
		.with(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| config.logging.level.clone().into()),
		)
		.with(tracing_subscriber::fmt::layer())
		.init();

	let pool = db::create_pool(&config.database.url).await?;
	db::run_migrations(&pool).await?;
	let state = create_app_state(pool, &config);

	match args.command.unwrap_or(Command::Serve) {
		Command::CreateReservation {
			email,
			name,
			phone,
			dates,
			hosts,
			pets,
		} => {
			let reservation = commands::create_reservation(
				&state,
				CreateReservationArgs {
					email,
					name,
					phone,
					dates,
					hosts,
					pets,
				},
			)
			.await?;
			println!("{}", serde_json::to_string_pretty(&reservation)?);
			Ok(())
		}
		Command::GrantAdmin { email, revoke } => {
			let user = commands::set_admin(&state, &email, !revoke).await?;
			println!("{} admin={}", user.email, user.admin);
			Ok(())
		}
		Command::Serve | Command::Version => serve(state, &config).await,
	}
}

async fn serve(
	state: cuca_server::AppState,
	config: &ServerConfig,
) -> Result<(), Box<dyn std::error::Error>> {
	tracing::info!(
		host = %config.http.host,
		port = config.http.port,
		database = %config.database.url,
		environment = %config.auth.environment,
		"starting cuca-server"
	);

	let app = create_router(state)
		.layer(TraceLayer::new_for_http())
		.layer(
			CorsLayer::new()
				.allow_origin(Any)
				.allow_methods(Any)
				.allow_headers(Any),
		);

	let addr = config.socket_addr();
	tracing::info!("listening on {}", addr);

	let listener = tokio::net::TcpListener::bind(&addr).await?;

	tokio::select! {
		result = axum::serve(listener, app) => {
			if let Err(e) = result {
				tracing::error!(error = %e, "Server error");
			}
		}
		_ = tokio::signal::ctrl_c() => {
			tracing::info!("Received shutdown signal");
		}
	}

	tracing::info!("Server shutdown complete");
	Ok(())
}
