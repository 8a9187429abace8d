pub mod auto_answers;
pub mod games;
pub mod players;
pub mod results;
pub mod rounds;
pub mod tasks;
pub mod variant_likes;
pub mod variant_selections;
pub mod variants;
