use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ----- Iden enums for tables & columns -----
#[derive(Iden)]
enum Games {
    Table,
    Id,
    Code,
    Language,
    Cycles,
    Stage,
    IsPaused,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Players {
    Table,
    Id,
    GameId,
    IsHost,
    Nickname,
    Avatar,
    ChannelName,
    DrawingColor,
    CreatedAt,
}

#[derive(Iden)]
enum Rounds {
    Table,
    Id,
    GameId,
    OrderNumber,
    PainterId,
    PaintingTask,
    Painting,
    Stage,
}

#[derive(Iden)]
enum Tasks {
    Table,
    Id,
    Language,
    Text,
    Source,
}

#[derive(Iden)]
enum AutoAnswers {
    Table,
    Id,
    Language,
    Text,
    Source,
}

#[derive(Iden)]
enum Variants {
    Table,
    Id,
    RoundId,
    Text,
    AuthorId,
    TaskId,
}

#[derive(Iden)]
enum VariantSelections {
    Table,
    Id,
    VariantId,
    PlayerId,
}

#[derive(Iden)]
enum VariantLikes {
    Table,
    Id,
    VariantId,
    PlayerId,
}

#[derive(Iden)]
enum Results {
    Table,
    Id,
    GameId,
    PlayerId,
    Result,
    RoundIncrement,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // games
        manager
            .create_table(
                Table::create()
                    .table(Games::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Games::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(Games::Code).string_len(10).not_null())
                    .col(ColumnDef::new(Games::Language).string_len(10).not_null())
                    .col(
                        ColumnDef::new(Games::Cycles)
                            .integer()
                            .not_null()
                            .default(2),
                    )
                    .col(ColumnDef::new(Games::Stage).string_len(20).not_null())
                    .col(
                        ColumnDef::new(Games::IsPaused)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Games::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Games::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Room codes collide only among non-finished games; uniqueness is
        // enforced by the generator, so this index is for lookup speed only.
        manager
            .create_index(
                Index::create()
                    .name("idx_games_code")
                    .table(Games::Table)
                    .col(Games::Code)
                    .to_owned(),
            )
            .await?;

        // players
        manager
            .create_table(
                Table::create()
                    .table(Players::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Players::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(Players::GameId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Players::IsHost)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Players::Nickname).string_len(100).null())
                    .col(ColumnDef::new(Players::Avatar).string().null())
                    .col(ColumnDef::new(Players::ChannelName).string_len(64).null())
                    .col(
                        ColumnDef::new(Players::DrawingColor)
                            .string_len(16)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Players::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_players_game_id")
                            .from(Players::Table, Players::GameId)
                            .to(Games::Table, Games::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_players_game_id")
                    .table(Players::Table)
                    .col(Players::GameId)
                    .to_owned(),
            )
            .await?;

        // rounds
        manager
            .create_table(
                Table::create()
                    .table(Rounds::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Rounds::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(Rounds::GameId).big_integer().not_null())
                    .col(ColumnDef::new(Rounds::OrderNumber).integer().not_null())
                    .col(ColumnDef::new(Rounds::PainterId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Rounds::PaintingTask)
                            .string_len(1000)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Rounds::Painting).string().null())
                    .col(ColumnDef::new(Rounds::Stage).string_len(20).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rounds_game_id")
                            .from(Rounds::Table, Rounds::GameId)
                            .to(Games::Table, Games::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rounds_painter_id")
                            .from(Rounds::Table, Rounds::PainterId)
                            .to(Players::Table, Players::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_rounds_game_id_order_number")
                    .table(Rounds::Table)
                    .col(Rounds::GameId)
                    .col(Rounds::OrderNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // tasks
        manager
            .create_table(
                Table::create()
                    .table(Tasks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Tasks::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(Tasks::Language).string_len(10).not_null())
                    .col(ColumnDef::new(Tasks::Text).text().not_null())
                    .col(
                        ColumnDef::new(Tasks::Source)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_tasks_language")
                    .table(Tasks::Table)
                    .col(Tasks::Language)
                    .to_owned(),
            )
            .await?;

        // auto_answers
        manager
            .create_table(
                Table::create()
                    .table(AutoAnswers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AutoAnswers::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(
                        ColumnDef::new(AutoAnswers::Language)
                            .string_len(10)
                            .not_null(),
                    )
                    .col(ColumnDef::new(AutoAnswers::Text).text().not_null())
                    .col(
                        ColumnDef::new(AutoAnswers::Source)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .to_owned(),
            )
            .await?;

        // variants
        manager
            .create_table(
                Table::create()
                    .table(Variants::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Variants::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(Variants::RoundId).big_integer().not_null())
                    .col(ColumnDef::new(Variants::Text).string_len(100).not_null())
                    .col(ColumnDef::new(Variants::AuthorId).big_integer().null())
                    .col(ColumnDef::new(Variants::TaskId).big_integer().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_variants_round_id")
                            .from(Variants::Table, Variants::RoundId)
                            .to(Rounds::Table, Rounds::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_variants_author_id")
                            .from(Variants::Table, Variants::AuthorId)
                            .to(Players::Table, Players::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_variants_task_id")
                            .from(Variants::Table, Variants::TaskId)
                            .to(Tasks::Table, Tasks::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_variants_round_id")
                    .table(Variants::Table)
                    .col(Variants::RoundId)
                    .to_owned(),
            )
            .await?;

        // variant_selections
        manager
            .create_table(
                Table::create()
                    .table(VariantSelections::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(VariantSelections::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(
                        ColumnDef::new(VariantSelections::VariantId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(VariantSelections::PlayerId)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_variant_selections_variant_id")
                            .from(VariantSelections::Table, VariantSelections::VariantId)
                            .to(Variants::Table, Variants::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_variant_selections_player_id")
                            .from(VariantSelections::Table, VariantSelections::PlayerId)
                            .to(Players::Table, Players::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_variant_selections_variant_id_player_id")
                    .table(VariantSelections::Table)
                    .col(VariantSelections::VariantId)
                    .col(VariantSelections::PlayerId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // variant_likes
        manager
            .create_table(
                Table::create()
                    .table(VariantLikes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(VariantLikes::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(
                        ColumnDef::new(VariantLikes::VariantId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(VariantLikes::PlayerId)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_variant_likes_variant_id")
                            .from(VariantLikes::Table, VariantLikes::VariantId)
                            .to(Variants::Table, Variants::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_variant_likes_player_id")
                            .from(VariantLikes::Table, VariantLikes::PlayerId)
                            .to(Players::Table, Players::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_variant_likes_variant_id_player_id")
                    .table(VariantLikes::Table)
                    .col(VariantLikes::VariantId)
                    .col(VariantLikes::PlayerId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // results
        manager
            .create_table(
                Table::create()
                    .table(Results::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Results::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(Results::GameId).big_integer().not_null())
                    .col(ColumnDef::new(Results::PlayerId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Results::Result)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Results::RoundIncrement)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_results_game_id")
                            .from(Results::Table, Results::GameId)
                            .to(Games::Table, Games::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_results_player_id")
                            .from(Results::Table, Results::PlayerId)
                            .to(Players::Table, Players::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_results_game_id_player_id")
                    .table(Results::Table)
                    .col(Results::GameId)
                    .col(Results::PlayerId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Results::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(VariantLikes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(VariantSelections::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Variants::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AutoAnswers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Tasks::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Rounds::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Players::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Games::Table).to_owned())
            .await?;
        Ok(())
    }
}
