use std::sync::Arc;

use cotacoes_core::{
    refine, AssetType, ClientConfig, CotacoesApi, Filters, ListRequest, MetadataCascade,
    QuoteQueryEngine, Sector, SortColumn, SortOrder, SortState, SurfaceKind, ValidationError,
};
use serde::Serialize;

use crate::cli::ListArgs;
use crate::error::CliError;

use super::{applied, compact, number, CommandResult, Table};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ListResponseData<'a> {
    quotes: &'a [cotacoes_core::Quote],
    pagination: cotacoes_core::Pagination,
    request: ListRequest,
}

pub async fn run(
    args: &ListArgs,
    api: Arc<dyn CotacoesApi>,
    config: &ClientConfig,
) -> Result<CommandResult, CliError> {
    let filters = confirmed_filters(requested_filters(args)?, Arc::clone(&api)).await?;
    let request = build_request(args, filters, config)?;
    let engine = QuoteQueryEngine::new(api);

    let page = applied(SurfaceKind::QuoteList, engine.query(request).await)?;
    let quotes = refine(
        &page.quotes,
        &request.filters,
        request.sort.column,
        request.sort.order,
    );
    if quotes.len() != page.quotes.len() {
        log::warn!(
            "server ignored part of the filter: kept {} of {} quotes",
            quotes.len(),
            page.quotes.len()
        );
    }

    let data = serde_json::to_value(ListResponseData {
        quotes: &quotes,
        pagination: page.pagination,
        request,
    })?;

    let mut table = Table::new(vec![
        "TICKER", "NAME", "PRICE", "CHANGE%", "MKT CAP", "VOLUME", "SECTOR", "TYPE",
    ]);
    for quote in &quotes {
        table.push_row(vec![
            quote.ticker.clone(),
            quote.display_name.clone().unwrap_or_default(),
            number(quote.displayed_price()),
            number(quote.change_percent),
            compact(quote.market_cap),
            compact(quote.volume),
            quote.sector.map(|s| s.label_pt().to_owned()).unwrap_or_default(),
            quote.asset_type.map(|t| t.label_pt().to_owned()).unwrap_or_default(),
        ]);
    }
    let pagination = page.pagination;
    table.push_footer(format!(
        "page {} of {} ({} quotes)",
        pagination.current_page, pagination.total_pages, pagination.total_count
    ));

    Ok(CommandResult::new(data, table))
}

fn requested_filters(args: &ListArgs) -> Result<Filters, CliError> {
    let sector = args
        .sector
        .as_deref()
        .map(str::parse::<Sector>)
        .transpose()?;
    let asset_type = args
        .asset_type
        .as_deref()
        .map(str::parse::<AssetType>)
        .transpose()?;
    Ok(Filters::new(sector, asset_type))
}

/// Run a requested type through the sector cascade so that a pair the
/// sector does not offer is never sent to the quotes endpoint.
async fn confirmed_filters(
    requested: Filters,
    api: Arc<dyn CotacoesApi>,
) -> Result<Filters, CliError> {
    let Some(asset_type) = requested.asset_type else {
        return Ok(requested);
    };

    let cascade = MetadataCascade::new(api);
    cascade.select_type(Some(asset_type))?;
    applied(SurfaceKind::Types, cascade.select_sector(requested.sector).await)?;

    let filters = cascade.filters();
    if filters.asset_type.is_none() {
        return Err(ValidationError::AssetTypeUnavailable {
            value: asset_type.as_str().to_owned(),
        }
        .into());
    }
    Ok(filters)
}

fn build_request(
    args: &ListArgs,
    filters: Filters,
    config: &ClientConfig,
) -> Result<ListRequest, CliError> {
    let column = args
        .sort_by
        .as_deref()
        .map(str::parse::<SortColumn>)
        .transpose()?;
    let order = args
        .order
        .as_deref()
        .map(str::parse::<SortOrder>)
        .transpose()?;

    let default_sort = SortState::default();
    let sort = match (column, order) {
        (None, None) => default_sort,
        (None, Some(order)) => SortState::new(default_sort.column, order),
        (Some(column), Some(order)) => SortState::new(column, order),
        (Some(column), None) if column == default_sort.column => default_sort,
        (Some(column), None) => SortState::new(column, SortOrder::Asc),
    };

    ListRequest::new(filters, sort, args.page, config.per_page).map_err(CliError::from)
}

#[cfg(test)]
mod tests {
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use cotacoes_core::{ApiError, ChartRange, Interval, QuoteListPayload, StockDetail, Symbol};

    use super::*;

    type Reply<'a, T> = Pin<Box<dyn Future<Output = Result<T, ApiError>> + Send + 'a>>;

    /// Offers a fixed type catalog and counts quote list requests.
    struct FixedCatalog {
        types: Vec<AssetType>,
        list_requests: AtomicUsize,
    }

    impl FixedCatalog {
        fn offering(types: &[AssetType]) -> Arc<Self> {
            Arc::new(Self {
                types: types.to_vec(),
                list_requests: AtomicUsize::new(0),
            })
        }
    }

    impl CotacoesApi for FixedCatalog {
        fn list_quotes<'a>(&'a self, _request: ListRequest) -> Reply<'a, QuoteListPayload> {
            self.list_requests.fetch_add(1, Ordering::SeqCst);
            Box::pin(async { Ok(QuoteListPayload::default()) })
        }

        fn sectors<'a>(&'a self) -> Reply<'a, Vec<Sector>> {
            Box::pin(async { Ok(Vec::new()) })
        }

        fn types<'a>(&'a self, _sector: Option<Sector>) -> Reply<'a, Vec<AssetType>> {
            Box::pin(async move { Ok(self.types.clone()) })
        }

        fn stock_detail<'a>(
            &'a self,
            _symbol: Symbol,
            _range: ChartRange,
            _interval: Interval,
        ) -> Reply<'a, StockDetail> {
            Box::pin(async { Err(ApiError::transport("not scripted")) })
        }
    }

    fn args(sort_by: Option<&str>, order: Option<&str>) -> ListArgs {
        ListArgs {
            sector: Some("Finance".into()),
            asset_type: Some("dr".into()),
            sort_by: sort_by.map(Into::into),
            order: order.map(Into::into),
            page: 2,
        }
    }

    fn request_for(args: &ListArgs) -> ListRequest {
        let filters = requested_filters(args).expect("filters");
        build_request(args, filters, &ClientConfig::default()).expect("request")
    }

    #[test]
    fn new_sort_column_without_order_starts_ascending() {
        let request = request_for(&args(Some("volume"), None));
        assert_eq!(request.sort, SortState::new(SortColumn::Volume, SortOrder::Asc));
        assert_eq!(request.filters.asset_type, Some(AssetType::DepositaryReceipt));
        assert_eq!(request.page(), 2);
    }

    #[test]
    fn default_sort_applies_without_flags() {
        let request = request_for(&args(None, None));
        assert_eq!(request.sort, SortState::default());
    }

    #[test]
    fn unknown_sector_is_a_validation_error() {
        let mut bad = args(None, None);
        bad.sector = Some("Agro".into());
        let error = requested_filters(&bad).expect_err("unknown sector");
        assert_eq!(error.exit_code(), 2);
    }

    #[tokio::test]
    async fn type_not_offered_by_sector_is_rejected_before_listing() {
        let api = FixedCatalog::offering(&[AssetType::Stock, AssetType::Fund]);

        let error = run(&args(None, None), api.clone(), &ClientConfig::default())
            .await
            .err()
            .expect("bdr is not offered for Finance");

        assert!(matches!(
            error,
            CliError::Validation(ValidationError::AssetTypeUnavailable { .. })
        ));
        assert_eq!(error.exit_code(), 2);
        assert_eq!(api.list_requests.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn type_offered_by_sector_reaches_the_quote_list() {
        let api = FixedCatalog::offering(&[AssetType::Stock, AssetType::DepositaryReceipt]);

        let requested = requested_filters(&args(None, None)).expect("filters");
        let filters = confirmed_filters(requested, api.clone())
            .await
            .expect("bdr offered for Finance");

        assert_eq!(filters, requested);

        run(&args(None, None), api.clone(), &ClientConfig::default())
            .await
            .map(|_| ())
            .expect("list loads");
        assert_eq!(api.list_requests.load(Ordering::SeqCst), 1);
    }
}
