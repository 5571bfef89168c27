pub mod spotify;
pub mod transport;
pub mod youtube;

pub use spotify::SpotifyClient;
pub use youtube::YouTubeClient;
