//! Create the owner tables and their meta side tables

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
	async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
		manager
			.create_table(
				Table::create()
					.table(Posts::Table)
					.if_not_exists()
					.col(
						ColumnDef::new(Posts::Id)
							.big_integer()
							.not_null()
							.auto_increment()
							.primary_key(),
					)
					.col(
						ColumnDef::new(Posts::PostAuthor)
							.big_integer()
							.not_null()
							.default(0),
					)
					.col(ColumnDef::new(Posts::PostTitle).text().not_null())
					.col(ColumnDef::new(Posts::PostName).string_len(200).not_null())
					.col(ColumnDef::new(Posts::PostType).string_len(20).not_null().default("post"))
					.col(
						ColumnDef::new(Posts::PostStatus)
							.string_len(20)
							.not_null()
							.default("publish"),
					)
					.to_owned(),
			)
			.await?;

		manager
			.create_table(
				Table::create()
					.table(Comments::Table)
					.if_not_exists()
					.col(
						ColumnDef::new(Comments::CommentId)
							.big_integer()
							.not_null()
							.auto_increment()
							.primary_key(),
					)
					.col(
						ColumnDef::new(Comments::CommentPostId)
							.big_integer()
							.not_null()
							.default(0),
					)
					.col(ColumnDef::new(Comments::CommentAuthor).text().not_null())
					.col(ColumnDef::new(Comments::CommentContent).text().not_null())
					.col(
						ColumnDef::new(Comments::CommentApproved)
							.string_len(20)
							.not_null()
							.default("1"),
					)
					.col(ColumnDef::new(Comments::UserId).big_integer().not_null().default(0))
					.to_owned(),
			)
			.await?;

		manager
			.create_table(
				Table::create()
					.table(Terms::Table)
					.if_not_exists()
					.col(
						ColumnDef::new(Terms::TermId)
							.big_integer()
							.not_null()
							.auto_increment()
							.primary_key(),
					)
					.col(ColumnDef::new(Terms::Name).string_len(200).not_null())
					.col(ColumnDef::new(Terms::Slug).string_len(200).not_null())
					.col(ColumnDef::new(Terms::TermGroup).big_integer().not_null().default(0))
					.to_owned(),
			)
			.await?;

		manager
			.create_table(
				Table::create()
					.table(Users::Table)
					.if_not_exists()
					.col(
						ColumnDef::new(Users::Id)
							.big_integer()
							.not_null()
							.auto_increment()
							.primary_key(),
					)
					.col(ColumnDef::new(Users::UserLogin).string_len(60).not_null())
					.col(ColumnDef::new(Users::UserEmail).string_len(100).not_null())
					.col(ColumnDef::new(Users::DisplayName).string_len(250).not_null())
					.to_owned(),
			)
			.await?;

		// Meta side tables all share the same shape
		for (table, pk, fk) in [
			(MetaTable::Commentmeta, MetaTable::MetaId, MetaTable::CommentId),
			(MetaTable::Postmeta, MetaTable::MetaId, MetaTable::PostId),
			(MetaTable::Termmeta, MetaTable::MetaId, MetaTable::TermId),
			(MetaTable::Usermeta, MetaTable::UmetaId, MetaTable::UserId),
		] {
			manager
				.create_table(
					Table::create()
						.table(table)
						.if_not_exists()
						.col(
							ColumnDef::new(pk)
								.big_integer()
								.not_null()
								.auto_increment()
								.primary_key(),
						)
						.col(ColumnDef::new(fk).big_integer().not_null().default(0))
						.col(ColumnDef::new(MetaTable::MetaKey).string_len(255).null())
						.col(ColumnDef::new(MetaTable::MetaValue).text().null())
						.to_owned(),
				)
				.await?;

			// Owner lookups and key filters
			manager
				.create_index(
					Index::create()
						.name(format!("idx_{}_{}", table.to_string(), fk.to_string()))
						.table(table)
						.col(fk)
						.to_owned(),
				)
				.await?;

			manager
				.create_index(
					Index::create()
						.name(format!("idx_{}_meta_key", table.to_string()))
						.table(table)
						.col(MetaTable::MetaKey)
						.to_owned(),
				)
				.await?;
		}

		Ok(())
	}

	async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
		for table in [
			MetaTable::Commentmeta,
			MetaTable::Postmeta,
			MetaTable::Termmeta,
			MetaTable::Usermeta,
		] {
			manager
				.drop_table(Table::drop().table(table).to_owned())
				.await?;
		}

		manager
			.drop_table(Table::drop().table(Comments::Table).to_owned())
			.await?;
		manager
			.drop_table(Table::drop().table(Posts::Table).to_owned())
			.await?;
		manager
			.drop_table(Table::drop().table(Terms::Table).to_owned())
			.await?;
		manager
			.drop_table(Table::drop().table(Users::Table).to_owned())
			.await
	}
}

#[derive(DeriveIden)]
enum Posts {
	Table,
	#[sea_orm(iden = "ID")]
	Id,
	PostAuthor,
	PostTitle,
	PostName,
	PostType,
	PostStatus,
}

#[derive(DeriveIden)]
enum Comments {
	Table,
	#[sea_orm(iden = "comment_ID")]
	CommentId,
	#[sea_orm(iden = "comment_post_ID")]
	CommentPostId,
	CommentAuthor,
	CommentContent,
	CommentApproved,
	UserId,
}

#[derive(DeriveIden)]
enum Terms {
	Table,
	TermId,
	Name,
	Slug,
	TermGroup,
}

#[derive(DeriveIden)]
enum Users {
	Table,
	#[sea_orm(iden = "ID")]
	Id,
	UserLogin,
	UserEmail,
	DisplayName,
}

#[derive(Copy, Clone, DeriveIden)]
enum MetaTable {
	Commentmeta,
	Postmeta,
	Termmeta,
	Usermeta,
	MetaId,
	UmetaId,
	CommentId,
	PostId,
	TermId,
	UserId,
	MetaKey,
	MetaValue,
}
