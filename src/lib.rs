//! Relationship mind map for a tabletop campaign manager: fetches entity
//! graphs from the campaign backend, styles and lays them out, and draws
//! them on a canvas as a Leptos client-side app.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, info};

pub mod api;
pub mod config;
pub mod graph;
pub mod interaction;

// Modules
mod components;
mod pages;

// Top-Level pages
use crate::config::AppConfig;
use crate::graph::NodeType;
use crate::pages::entity::EntityDetail;
use crate::pages::hierarchy::Hierarchy;
use crate::pages::home::Home;
use crate::pages::not_found::NotFound;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("Logging initialized");
}

/// The app router: mind map, hierarchy, one page per entity type, and 404.
#[component]
pub fn App() -> impl IntoView {
	// Provides context that manages stylesheets, titles, meta tags, etc.
	provide_meta_context();
	let config = AppConfig::from_env();
	info!("campaign API at {}", config.api_base_url);
	provide_context(config);

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />

		// sets the document title
		<Title text="Campaign Relationships" />

		// injects metadata in the <head> of the page
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Router>
			<Routes fallback=|| view! { <NotFound /> }>
				<Route path=path!("/") view=Home />
				<Route path=path!("/hierarchy") view=Hierarchy />
				<Route path=path!("/worlds/:id") view=|| view! { <EntityDetail kind=NodeType::World /> } />
				<Route
					path=path!("/campaigns/:id")
					view=|| view! { <EntityDetail kind=NodeType::Campaign /> }
				/>
				<Route
					path=path!("/sessions/:id")
					view=|| view! { <EntityDetail kind=NodeType::Session /> }
				/>
				<Route
					path=path!("/characters/:id")
					view=|| view! { <EntityDetail kind=NodeType::Character /> }
				/>
				<Route
					path=path!("/locations/:id")
					view=|| view! { <EntityDetail kind=NodeType::Location /> }
				/>
				<Route path=path!("/items/:id") view=|| view! { <EntityDetail kind=NodeType::Item /> } />
				<Route path=path!("/events/:id") view=|| view! { <EntityDetail kind=NodeType::Event /> } />
				<Route path=path!("/powers/:id") view=|| view! { <EntityDetail kind=NodeType::Power /> } />
			</Routes>
		</Router>
	}
}
