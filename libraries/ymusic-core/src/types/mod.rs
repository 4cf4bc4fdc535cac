mod account;
mod album;
mod artist;
mod ids;
mod library;
mod playlist;
mod response;
mod search;
mod track;

pub use account::{Account, AccountStatus, Permissions, Plus};
pub use album::{Album, AlbumRef};
pub use artist::{Artist, ArtistBriefInfo, ArtistCounts, ArtistRef, TracksPage};
pub use ids::{AlbumId, ArtistId, TrackId};
pub use library::{
    LibraryList, LibrarySection, LikedItem, LikedPlaylist, LikedTracks, LikedTracksLibrary,
    ListenedTrack, PlayContextType, RecentlyListened, RecentlyListenedContexts,
};
pub use playlist::{ChangeOperation, Owner, Playlist, PlaylistChange, PlaylistKey, TrackContainer};
pub use response::{ApiErrorBody, ApiErrorEnvelope, InvocationInfo, Pager, Response, Revision};
pub use search::{SearchBest, SearchResults, SearchSection, SearchType, Suggestions};
pub use track::{
    DownloadInfo, Lyrics, SimilarTracks, StorageFile, Track, TrackKey, TrackSupplement,
};
