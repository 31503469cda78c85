//! Shared fixtures for the integration tests

#![allow(dead_code)]

use sea_orm::{ActiveModelBehavior, ActiveModelTrait, Set};
use std::sync::Arc;
use wpmeta_core::entities::{comment, post, term, user};
use wpmeta_core::{Database, HostConnection, MetaResolver, MetaService, TablePrefix};

/// Service over a fresh, migrated in-memory database
pub async fn service() -> MetaService {
	service_with(MetaResolver::builtin()).await
}

pub async fn service_with(resolver: MetaResolver) -> MetaService {
	let db = Database::in_memory().await.expect("in-memory database");
	db.migrate().await.expect("migrations");

	let host = HostConnection::new(db.into_conn(), TablePrefix::default());
	MetaService::new(Arc::new(host), resolver)
}

pub async fn insert_post(service: &MetaService, title: &str) -> post::Model {
	post::ActiveModel {
		post_title: Set(title.to_owned()),
		post_name: Set(title.to_lowercase().replace(' ', "-")),
		..post::ActiveModel::new()
	}
	.insert(service.host().conn())
	.await
	.expect("insert post")
}

pub async fn insert_comment(service: &MetaService, post_id: i64, content: &str) -> comment::Model {
	comment::ActiveModel {
		comment_post_id: Set(post_id),
		comment_author: Set("reader".to_owned()),
		comment_content: Set(content.to_owned()),
		..comment::ActiveModel::new()
	}
	.insert(service.host().conn())
	.await
	.expect("insert comment")
}

pub async fn insert_term(service: &MetaService, name: &str) -> term::Model {
	term::ActiveModel {
		name: Set(name.to_owned()),
		slug: Set(name.to_lowercase()),
		term_group: Set(0),
		..ActiveModelTrait::default()
	}
	.insert(service.host().conn())
	.await
	.expect("insert term")
}

pub async fn insert_user(service: &MetaService, login: &str) -> user::Model {
	user::ActiveModel {
		user_login: Set(login.to_owned()),
		user_email: Set(format!("{login}@example.com")),
		display_name: Set(login.to_owned()),
		..ActiveModelTrait::default()
	}
	.insert(service.host().conn())
	.await
	.expect("insert user")
}
