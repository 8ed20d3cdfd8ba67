/// The operations exposed over HTTP, addressed by the last path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    FetchPart,
    FetchMenu,
    FetchRecords,
    InsertRecord,
    InsertMenu,
    DeleteRecord,
    FetchOldPart,
    FetchOldMenu,
    FetchOldRecords,
}

impl Route {
    pub const ALL: [Route; 9] = [
        Route::FetchPart,
        Route::FetchMenu,
        Route::FetchRecords,
        Route::InsertRecord,
        Route::InsertMenu,
        Route::DeleteRecord,
        Route::FetchOldPart,
        Route::FetchOldMenu,
        Route::FetchOldRecords,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Route::FetchPart => "fetchPart",
            Route::FetchMenu => "fetchMenu",
            Route::FetchRecords => "fetchRecords",
            Route::InsertRecord => "insertRecord",
            Route::InsertMenu => "insertMenu",
            Route::DeleteRecord => "deleteRecord",
            Route::FetchOldPart => "fetchOldPart",
            Route::FetchOldMenu => "fetchOldMenu",
            Route::FetchOldRecords => "fetchOldRecords",
        }
    }

    /// Matches the last non-empty segment of `path` against the route names.
    /// Matching is exact and case sensitive.
    pub fn from_path(path: &str) -> Option<Route> {
        let segment = path.split('/').filter(|s| !s.is_empty()).last()?;
        Route::ALL.into_iter().find(|route| route.name() == segment)
    }
}

/// Label used for metrics, bounded to the known route names.
pub fn route_label(path: &str) -> &'static str {
    Route::from_path(path)
        .map(Route::name)
        .unwrap_or("unmatched")
}
