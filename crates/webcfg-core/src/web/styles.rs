//! Stylesheet rules, one per dialect.
//!
//! | dialect      | test                | type (cssModules) | loader           |
//! |--------------|---------------------|-------------------|------------------|
//! | `Css`        | `\.css$`            | `css/module`      | none             |
//! | `GlobalCss`  | `\.css$`            | `css` always      | `postcss-loader` |
//! | `Sass`       | `\.scss$\|\.sass$`  | `css/module`      | `sass-loader`    |
//! | `Less`       | `\.less$`           | `css/module`      | `less-loader`    |
//! | `Stylus`     | `\.styl$`           | none              | `stylus-loader`  |
//!
//! Both `.css` rules are emitted when CSS Modules are on; the bundler decides
//! how the two combine.

use crate::bundler::{
    LessLoaderOptions, LessOptions, LoaderOptions, RuleSetRule, RuleType, SassLoaderOptions,
    SassOptions, StylusLoaderOptions, StylusOptions,
};
use crate::loader::LoaderResolver;
use std::path::PathBuf;

/// Precision bootstrap-sass needs at minimum.
pub const SASS_PRECISION: u32 = 8;

/// Inputs shared by every style rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleSettings {
    pub css_modules: bool,
    pub source_map: bool,
    /// Absolute include paths for preprocessor imports.
    pub include_paths: Vec<PathBuf>,
}

/// A stylesheet dialect with its own rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleDialect {
    /// Plain CSS as CSS Modules.
    Css,
    /// Plain CSS through PostCSS.
    GlobalCss,
    Sass,
    Less,
    Stylus,
}

impl StyleDialect {
    /// All dialects in rule order.
    pub const ALL: [StyleDialect; 5] = [
        Self::Css,
        Self::GlobalCss,
        Self::Sass,
        Self::Less,
        Self::Stylus,
    ];

    /// Regular expression source matched against resource paths.
    #[must_use]
    pub fn test(self) -> &'static str {
        match self {
            Self::Css | Self::GlobalCss => r"\.css$",
            Self::Sass => r"\.scss$|\.sass$",
            Self::Less => r"\.less$",
            Self::Stylus => r"\.styl$",
        }
    }

    /// Loader package, if the dialect needs one.
    #[must_use]
    pub fn loader(self) -> Option<&'static str> {
        match self {
            Self::Css => None,
            Self::GlobalCss => Some("postcss-loader"),
            Self::Sass => Some("sass-loader"),
            Self::Less => Some("less-loader"),
            Self::Stylus => Some("stylus-loader"),
        }
    }

    fn rule_type(self, css_modules: bool) -> Option<RuleType> {
        match self {
            Self::GlobalCss => Some(RuleType::Css),
            Self::Css | Self::Sass | Self::Less => css_modules.then_some(RuleType::CssModule),
            Self::Stylus => None,
        }
    }

    fn loader_options(self, settings: &StyleSettings) -> Option<LoaderOptions> {
        let source_map = settings.source_map;
        let include_paths = settings.include_paths.clone();

        match self {
            Self::Css | Self::GlobalCss => None,
            Self::Sass => Some(LoaderOptions::Sass(SassLoaderOptions {
                source_map,
                sass_options: SassOptions {
                    fiber: false,
                    precision: SASS_PRECISION,
                    include_paths,
                },
            })),
            Self::Less => Some(LoaderOptions::Less(LessLoaderOptions {
                source_map,
                less_options: LessOptions {
                    javascript_enabled: true,
                    paths: (!include_paths.is_empty()).then_some(include_paths),
                },
            })),
            Self::Stylus => Some(LoaderOptions::Stylus(StylusLoaderOptions {
                source_map,
                stylus_options: StylusOptions {
                    include: include_paths,
                },
            })),
        }
    }

    /// Build this dialect's rule, or `None` when it would be inert.
    #[must_use]
    pub fn rule(self, settings: &StyleSettings, loaders: &dyn LoaderResolver) -> Option<RuleSetRule> {
        let mut rule = RuleSetRule::new(self.test()).with_type(self.rule_type(settings.css_modules));
        if let Some(loader) = self.loader() {
            rule = rule.with_loader(loaders.resolve(loader), self.loader_options(settings));
        }
        (!rule.is_inert()).then_some(rule)
    }
}

/// Rules for every dialect, in order, with inert rules dropped.
#[must_use]
pub fn style_rules(settings: &StyleSettings, loaders: &dyn LoaderResolver) -> Vec<RuleSetRule> {
    StyleDialect::ALL
        .iter()
        .filter_map(|dialect| dialect.rule(settings, loaders))
        .collect()
}
