//! Sea-ORM entity definitions
//!
//! WordPress owner tables and their meta side tables.

pub mod comment;
pub mod comment_meta;
pub mod post;
pub mod post_meta;
pub mod term;
pub mod term_meta;
pub mod user;
pub mod user_meta;

use sea_orm::{ActiveModelTrait, Set};

use crate::meta::{MetaEntity, MetaField, MetaValue, OwnerEntity, OwnerKind};

// Re-export all entities
pub use comment::Entity as Comment;
pub use comment_meta::Entity as CommentMeta;
pub use post::Entity as Post;
pub use post_meta::Entity as PostMeta;
pub use term::Entity as Term;
pub use term_meta::Entity as TermMeta;
pub use user::Entity as User;
pub use user_meta::Entity as UserMeta;

// Re-export active models for easy access
pub use comment::ActiveModel as CommentActive;
pub use comment_meta::ActiveModel as CommentMetaActive;
pub use post::ActiveModel as PostActive;
pub use post_meta::ActiveModel as PostMetaActive;
pub use term::ActiveModel as TermActive;
pub use term_meta::ActiveModel as TermMetaActive;
pub use user::ActiveModel as UserActive;
pub use user_meta::ActiveModel as UserMetaActive;

/// Wires an owner entity to its meta entity.
///
/// Every meta table shares `meta_key`/`meta_value`; only the primary key and
/// the owner foreign key differ.
macro_rules! meta_owner {
	(
		$kind:ident,
		$owner:ident.$owner_pk:ident,
		$meta:ident.$meta_pk:ident,
		$fk:ident
	) => {
		impl OwnerEntity for $owner::Entity {
			const KIND: OwnerKind = OwnerKind::$kind;
			type Meta = $meta::Entity;

			fn owner_id(model: &$owner::Model) -> i64 {
				model.$owner_pk
			}
		}

		impl MetaEntity for $meta::Entity {
			fn new_row(owner_id: i64, key: &str, value: MetaValue) -> $meta::ActiveModel {
				$meta::ActiveModel {
					$fk: Set(owner_id),
					meta_key: Set(Some(key.to_owned())),
					meta_value: Set(value.into_inner()),
					..ActiveModelTrait::default()
				}
			}

			fn assign_value(row: &mut $meta::ActiveModel, value: MetaValue) {
				row.meta_value = Set(value.into_inner());
			}

			fn to_field(model: &$meta::Model) -> MetaField {
				MetaField {
					id: model.$meta_pk,
					owner_id: model.$fk,
					key: model.meta_key.clone().unwrap_or_default(),
					value: model.meta_value.clone(),
				}
			}
		}
	};
}

meta_owner!(Comment, comment.comment_id, comment_meta.meta_id, comment_id);
meta_owner!(Post, post.id, post_meta.meta_id, post_id);
meta_owner!(Term, term.term_id, term_meta.meta_id, term_id);
meta_owner!(User, user.id, user_meta.umeta_id, user_id);
